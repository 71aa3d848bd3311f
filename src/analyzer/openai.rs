//! OpenAI-backed subjective analyzer
//!
//! Uses structured extraction against the model named by `ANALYZER_MODEL`
//! (default gpt-4o), bounded by a 30 second deadline that cancels the
//! in-flight call.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::extractor::ExtractionError;
use rig::providers::openai;
use std::time::Duration;

use crate::model::extraction::ExtractedAnalysis;
use crate::model::{ListingData, RuleFlag};

use super::prompts::{build_analysis_prompt, ANALYSIS_SYSTEM_PROMPT};
use super::{validation, AnalyzerError, SubjectiveAnalysis, SubjectiveAnalyzer};

const ENV_ANALYZER_MODEL: &str = "ANALYZER_MODEL";
const DEFAULT_MODEL: &str = openai::GPT_4O;

const ANALYZER_TIMEOUT: Duration = Duration::from_secs(30);

/// Subjective analyzer backed by the OpenAI API
pub struct OpenAiAnalyzer {
    client: openai::Client,
    model: String,
}

impl OpenAiAnalyzer {
    /// Create an analyzer with the provided API key
    ///
    /// Optionally uses the `ANALYZER_MODEL` env var (defaults to gpt-4o).
    pub fn new(api_key: &str) -> Result<Self, String> {
        let client = openai::Client::new(api_key);

        let model =
            std::env::var(ENV_ANALYZER_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        tracing::info!(model = %model, "Subjective analyzer initialized");

        Ok(Self { client, model })
    }
}

#[async_trait]
impl SubjectiveAnalyzer for OpenAiAnalyzer {
    async fn analyze(
        &self,
        listing: &ListingData,
        rule_flags: &[RuleFlag],
        user_context: Option<&str>,
    ) -> Result<SubjectiveAnalysis, AnalyzerError> {
        let start_time = std::time::Instant::now();

        let prompt = build_analysis_prompt(listing, rule_flags, user_context);
        let prompt_length = prompt.len();

        tracing::debug!(
            model = %self.model,
            flag_count = rule_flags.len(),
            prompt_length = prompt_length,
            "Initiating subjective analysis call"
        );

        let extractor = self
            .client
            .extractor::<ExtractedAnalysis>(&self.model)
            .preamble(ANALYSIS_SYSTEM_PROMPT)
            .build();

        let extracted =
            match tokio::time::timeout(ANALYZER_TIMEOUT, extractor.extract(&prompt)).await {
                Err(_) => {
                    tracing::warn!(
                        model = %self.model,
                        elapsed_ms = start_time.elapsed().as_millis(),
                        "Subjective analysis call timed out"
                    );
                    return Err(AnalyzerError::Timeout);
                }
                Ok(Err(e)) => {
                    tracing::error!(
                        model = %self.model,
                        elapsed_ms = start_time.elapsed().as_millis(),
                        error = %e,
                        "Subjective analysis call failed"
                    );
                    return Err(classify_extraction_error(e));
                }
                Ok(Ok(extracted)) => {
                    tracing::info!(
                        model = %self.model,
                        elapsed_ms = start_time.elapsed().as_millis(),
                        prompt_length = prompt_length,
                        "Subjective analysis call completed"
                    );
                    extracted
                }
            };

        validation::validate(extracted)
    }
}

/// Map a transport/extraction failure onto the analyzer error taxonomy
fn classify_extraction_error(e: ExtractionError) -> AnalyzerError {
    match e {
        ExtractionError::NoData => {
            AnalyzerError::Malformed("model returned no structured data".to_string())
        }
        ExtractionError::DeserializationError(e) => AnalyzerError::Malformed(e.to_string()),
        ExtractionError::CompletionError(e) => {
            let message = e.to_string();
            let lowered = message.to_lowercase();
            if lowered.contains("429") || lowered.contains("rate limit") {
                AnalyzerError::RateLimited
            } else {
                AnalyzerError::Unavailable(message)
            }
        }
    }
}
