//! Unified API error handling
//!
//! Every endpoint returns `Result<T, ApiError>`; failures serialize into a
//! stable envelope: `{"error": {"code", "message", "details"?}}`.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

use crate::extractor::FetchError;
use crate::service::AnalysisError;

/// Standard error response envelope
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable machine-readable code
    pub code: String,
    /// Human-readable message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Unified API error type
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Malformed request body or parameters (400)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Wrong host/path or unextractable content (422)
    #[error("Unsupported URL: {0}")]
    UnsupportedUrl(String),

    /// Fetch or external-analysis deadline exceeded (504)
    #[error("Timeout: {0}")]
    Timeout(String),

    /// External-analysis quota exhausted (429); normally absorbed by the
    /// degradation policy, surfaced only outside it
    #[error("Rate limited: {0}")]
    #[allow(dead_code)]
    RateLimited(String),

    /// Network failure or non-2xx fetching the source page (502)
    #[error("Upstream fetch failed: {0}")]
    UpstreamFetchFailed(String),

    /// External analysis unreachable/malformed when not absorbed by the
    /// degradation policy (503)
    #[error("Service unavailable: {0}")]
    #[allow(dead_code)]
    ServiceUnavailable(String),

    /// Anything unclassified (500); details are logged, never returned
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "INVALID_REQUEST",
            ApiError::UnsupportedUrl(_) => "UNSUPPORTED_URL",
            ApiError::Timeout(_) => "TIMEOUT",
            ApiError::RateLimited(_) => "RATE_LIMITED",
            ApiError::UpstreamFetchFailed(_) => "UPSTREAM_FETCH_FAILED",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedUrl(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::UpstreamFetchFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let code = self.code();

        tracing::error!(
            code = code,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        // Internal failures must never leak diagnostic detail
        let message = match self {
            ApiError::Internal(_) => "An unexpected error occurred during analysis.".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details: None,
            },
        })
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::UnsupportedSource => {
                ApiError::UnsupportedUrl(err.to_string())
            }
            AnalysisError::Fetch(FetchError::Timeout) => {
                ApiError::Timeout("Timed out fetching the listing page".to_string())
            }
            AnalysisError::Fetch(FetchError::Status(status)) => ApiError::UpstreamFetchFailed(
                format!("The listing page returned HTTP {}", status),
            ),
            AnalysisError::Fetch(FetchError::Network(_)) => ApiError::UpstreamFetchFailed(
                "A network error occurred fetching the listing page".to_string(),
            ),
            AnalysisError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}
