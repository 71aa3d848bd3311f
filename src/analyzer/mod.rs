//! Subjective listing analyzer
//!
//! The external collaborator that judges what deterministic rules cannot:
//! subjective red flags, cognitive-bias tactics, overall risk narrative.
//! Modeled as a swappable capability so the orchestrator's degradation path
//! is testable without live calls.

mod openai;
mod prompts;
pub mod validation;

pub use openai::OpenAiAnalyzer;

use async_trait::async_trait;

use crate::model::{Finding, ListingData, ReflectionPrompt, RiskAssessment, RuleFlag};

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("Subjective analysis timed out")]
    Timeout,

    #[error("Subjective analysis rate limited")]
    RateLimited,

    #[error("Subjective analysis unavailable: {0}")]
    Unavailable(String),

    #[error("Subjective analysis returned a malformed response: {0}")]
    Malformed(String),
}

/// Validated output of a successful subjective analysis
#[derive(Debug, Clone)]
pub struct SubjectiveAnalysis {
    pub risk: RiskAssessment,
    /// AI-detected findings only, already stripped of evidence
    pub findings: Vec<Finding>,
    pub reflection_prompts: Vec<ReflectionPrompt>,
}

/// Capability for subjective, context-sensitive risk judgment
///
/// Implementations receive the rule flags as confirmed facts and must not
/// re-evaluate or duplicate them.
#[async_trait]
pub trait SubjectiveAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        listing: &ListingData,
        rule_flags: &[RuleFlag],
        user_context: Option<&str>,
    ) -> Result<SubjectiveAnalysis, AnalyzerError>;
}
