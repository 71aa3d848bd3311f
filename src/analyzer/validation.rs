//! Validation of LLM-extracted analyses
//!
//! Enforces the analyzer contract before anything reaches the client: the
//! score is clamped and made authoritative over the symbolic level, finding
//! and prompt counts must be within bounds, and evidence payloads are
//! dropped during conversion.

use crate::model::extraction::{
    ExtractedAnalysis, ExtractedFinding, ExtractedFindingType, ExtractedSeverity,
};
use crate::model::{
    Finding, FindingType, ReflectionPrompt, RiskAssessment, RiskLevel, Severity,
};

use super::{AnalyzerError, SubjectiveAnalysis};

const MIN_FINDINGS: usize = 2;
const MAX_FINDINGS: usize = 6;
const MIN_PROMPTS: usize = 2;
const MAX_PROMPTS: usize = 4;

/// Validate an extracted analysis and convert it to the domain model
pub fn validate(extracted: ExtractedAnalysis) -> Result<SubjectiveAnalysis, AnalyzerError> {
    let finding_count = extracted.findings.len();
    if !(MIN_FINDINGS..=MAX_FINDINGS).contains(&finding_count) {
        return Err(AnalyzerError::Malformed(format!(
            "expected {}..={} findings, got {}",
            MIN_FINDINGS, MAX_FINDINGS, finding_count
        )));
    }

    let prompt_count = extracted.reflection_prompts.len();
    if !(MIN_PROMPTS..=MAX_PROMPTS).contains(&prompt_count) {
        return Err(AnalyzerError::Malformed(format!(
            "expected {}..={} reflection prompts, got {}",
            MIN_PROMPTS, MAX_PROMPTS, prompt_count
        )));
    }

    // Score is the sole source of truth; the supplied level is discarded and
    // re-derived through the shared threshold rule
    let score = extracted.risk.score.round().clamp(0.0, 100.0) as u8;
    let level = RiskLevel::from_score(score);

    let supplied_level = extracted.risk.level.trim().to_lowercase();
    if supplied_level != format!("{:?}", level).to_lowercase() {
        tracing::debug!(
            score = score,
            supplied_level = %supplied_level,
            "Supplied risk level inconsistent with score, corrected"
        );
    }

    let summary = extracted.risk.summary.trim().to_string();
    if summary.is_empty() {
        return Err(AnalyzerError::Malformed(
            "risk summary is empty".to_string(),
        ));
    }

    Ok(SubjectiveAnalysis {
        risk: RiskAssessment {
            score,
            level,
            summary,
        },
        findings: extracted.findings.into_iter().map(convert_finding).collect(),
        reflection_prompts: extracted
            .reflection_prompts
            .into_iter()
            .map(|p| ReflectionPrompt {
                id: p.id,
                prompt: p.prompt,
            })
            .collect(),
    })
}

/// Convert one extracted finding, dropping its evidence payload
fn convert_finding(extracted: ExtractedFinding) -> Finding {
    Finding {
        id: extracted.id,
        finding_type: match extracted.finding_type {
            ExtractedFindingType::RedFlag => FindingType::RedFlag,
            ExtractedFindingType::CognitiveBias => FindingType::CognitiveBias,
        },
        header: extracted.header,
        summary: extracted.summary,
        explanation: extracted.explanation,
        // Out-of-vocabulary severities demote to low so they sort last
        severity: match extracted.severity {
            ExtractedSeverity::High => Severity::High,
            ExtractedSeverity::Medium => Severity::Medium,
            ExtractedSeverity::Low | ExtractedSeverity::Unknown => Severity::Low,
        },
    }
}
