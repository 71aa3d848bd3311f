//! Application state and service initialization
//!
//! Centralizes service construction and dependency injection so handlers
//! receive fully wired services and tests can swap the collaborators.

use std::sync::Arc;

use crate::analyzer::OpenAiAnalyzer;
use crate::extractor::HttpListingFetcher;
use crate::model::Config;
use crate::service::{AnalysisCache, AnalysisService};

/// Application state containing all services and shared resources
pub struct AppState {
    pub config: Config,
    pub analysis_service: Arc<AnalysisService>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// Requires `OPENAI_API_KEY`; everything else has defaults.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let api_key =
            std::env::var("OPENAI_API_KEY").map_err(|_| AppError::MissingConfig("OPENAI_API_KEY"))?;

        let analyzer = OpenAiAnalyzer::new(&api_key)
            .map_err(|_| AppError::InvalidConfig("Invalid OPENAI_API_KEY"))?;

        let cache = AnalysisCache::new(config.cache_ttl_seconds);

        let analysis_service = Arc::new(AnalysisService::new(
            Arc::new(HttpListingFetcher::new()),
            Arc::new(analyzer),
            cache,
        ));

        Ok(Self {
            config,
            analysis_service,
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
