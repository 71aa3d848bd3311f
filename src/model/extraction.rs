//! Raw analysis shape extracted from the LLM
//!
//! These types mirror the JSON schema the model is prompted to produce.
//! They are validated and converted into the client-facing domain model in
//! `analyzer::validation`; the `evidence` payload never survives conversion.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Complete subjective analysis from the LLM
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedAnalysis {
    pub risk: ExtractedRisk,

    /// AI-detected findings only; pre-flagged deterministic findings are
    /// supplied in the prompt and must not be repeated here
    #[schemars(description = "2 to 6 findings of type red_flag or cognitive_bias")]
    pub findings: Vec<ExtractedFinding>,

    #[schemars(description = "2 to 4 reflection prompts tailored to this listing")]
    pub reflection_prompts: Vec<ExtractedPrompt>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedRisk {
    #[schemars(description = "Overall risk score from 0 to 100, accounting for all findings")]
    pub score: f64,

    #[schemars(description = "low, medium, or high; must match the score thresholds")]
    pub level: String,

    #[schemars(description = "1-2 sentence plain-language risk summary")]
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedFinding {
    #[schemars(description = "Flag id from the definitions provided, or a cognitive bias id")]
    pub id: String,

    #[serde(rename = "type")]
    pub finding_type: ExtractedFindingType,

    #[schemars(description = "Short title, 3-8 words")]
    pub header: String,

    #[schemars(description = "One-line summary")]
    pub summary: String,

    #[schemars(description = "2-3 sentence explanation of why this matters")]
    pub explanation: String,

    pub severity: ExtractedSeverity,

    /// Quoted or paraphrased evidence from the listing; internal only
    #[serde(default)]
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExtractedFindingType {
    RedFlag,
    CognitiveBias,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExtractedSeverity {
    Low,
    Medium,
    High,
    /// Anything the model invents outside the vocabulary
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedPrompt {
    #[schemars(description = "Identifier like rp_1, rp_2")]
    pub id: String,

    #[schemars(description = "A question helping the user think critically about this listing")]
    pub prompt: String,
}
