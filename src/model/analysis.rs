//! Risk analysis domain model
//!
//! The types returned to the client: findings, risk assessment, quiz
//! questions, and the assembled analysis result. `RuleFlag` is the one
//! internal type here; its evidence string feeds the analyzer prompt and is
//! never serialized into a response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::ListingData;

/// Severity of a finding or rule flag
///
/// Ordering is by escalation (`Low < Medium < High`) so findings can be
/// sorted by descending severity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Internal signal produced by one deterministic check
///
/// Evidence is human-readable and deterministic for a given listing; it is
/// passed to the subjective analyzer and then discarded.
#[derive(Debug, Clone)]
pub struct RuleFlag {
    pub id: &'static str,
    pub severity: Severity,
    pub evidence: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FindingType {
    RedFlag,
    CognitiveBias,
}

/// Client-facing signal, either converted from a rule flag or returned by
/// the subjective analyzer. Carries no evidence field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Finding {
    pub id: String,
    #[serde(rename = "type")]
    pub finding_type: FindingType,
    pub header: String,
    pub summary: String,
    pub explanation: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Shared threshold rule. The numeric score is the sole source of truth;
    /// any symbolic level is re-derived through this.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=33 => RiskLevel::Low,
            34..=66 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }
}

/// Numeric risk score with derived level and narrative summary
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RiskAssessment {
    /// 0 to 100 inclusive
    pub score: u8,
    pub level: RiskLevel,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReflectionPrompt {
    pub id: String,
    pub prompt: String,
}

/// Where the analyzed listing came from
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Source {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuizOption {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuizFeedback {
    pub correct_title: String,
    pub correct_body: String,
    pub incorrect_title: String,
    pub incorrect_body: String,
}

/// A multiple-choice question selected from the quiz bank
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuizQuestion {
    pub id: String,
    pub prompt: String,
    pub options: Vec<QuizOption>,
    pub correct_option_id: String,
    pub feedback: QuizFeedback,
    /// Finding ids that caused this question to be selected
    pub linked_finding_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
}

/// Complete result of one pipeline run. Immutable once assembled; cached by
/// normalized URL and returned verbatim on cache hits.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    pub analysis_id: String,
    pub created_at: DateTime<Utc>,
    pub source: Source,
    pub listing: ListingData,
    pub risk: RiskAssessment,
    /// Sorted by severity descending; ties preserve arrival order
    pub findings: Vec<Finding>,
    pub reflection_prompts: Vec<ReflectionPrompt>,
    pub quiz: Quiz,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_thresholds() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(33), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(34), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(66), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(67), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
    }

    #[test]
    fn severity_orders_by_escalation() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }
}
