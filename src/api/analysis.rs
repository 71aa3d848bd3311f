//! Listing analysis endpoint

use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use url::Url;
use utoipa::{OpenApi, ToSchema};

use crate::model::{AnalysisResult, Config, SourceConfig};
use crate::service::{AnalysisRequest, AnalysisService};

use super::error::ApiError;

/// Request body for creating an analysis
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Absolute listing URL on a supported marketplace
    pub url: String,
    /// Optional note about the user's situation or concerns
    pub user_context: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(create_analysis, super::health::liveness, super::health::readiness),
    components(schemas(
        AnalyzeRequest,
        AnalysisResult,
        crate::model::ListingData,
        crate::model::Finding,
        crate::model::RiskAssessment,
        crate::model::QuizQuestion,
    )),
    tags(
        (name = "analyses", description = "Listing scam-risk analysis"),
        (name = "health", description = "Service health probes")
    )
)]
pub struct ApiDoc;

/// Analyze a marketplace listing for scam risk
#[utoipa::path(
    post,
    path = "/api/analyses",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis completed", body = AnalysisResult),
        (status = 400, description = "Malformed request"),
        (status = 422, description = "Unsupported URL or unextractable listing"),
        (status = 502, description = "Failed to fetch the listing page"),
        (status = 504, description = "Fetch deadline exceeded")
    ),
    tag = "analyses"
)]
#[post("/api/analyses")]
pub async fn create_analysis(
    service: web::Data<AnalysisService>,
    config: web::Data<Config>,
    body: web::Json<AnalyzeRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = validate_request(&config.sources, body.into_inner())?;

    tracing::info!(url = %request.normalized_url, "Analysis requested");

    let result = service.analyze(request).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// Validate and normalize an incoming analysis request
///
/// Checks, in order: url present and non-empty, parses as an absolute URL,
/// host is a supported marketplace, path matches the listing pattern. The
/// normalized URL (lower-cased host, no trailing slash) becomes the cache
/// key. `user_context` is trimmed; empty collapses to `None`.
pub(crate) fn validate_request(
    sources: &SourceConfig,
    body: AnalyzeRequest,
) -> Result<AnalysisRequest, ApiError> {
    let raw_url = body.url.trim();
    if raw_url.is_empty() {
        return Err(ApiError::InvalidRequest(
            "'url' is required and must be a non-empty string".to_string(),
        ));
    }

    let url = Url::parse(raw_url)
        .map_err(|_| ApiError::InvalidRequest("'url' must be a valid absolute URL".to_string()))?;

    let host = url
        .host_str()
        .ok_or_else(|| ApiError::InvalidRequest("'url' must have a host".to_string()))?
        .to_lowercase();

    if !sources.is_supported_host(&url) {
        return Err(ApiError::UnsupportedUrl(format!(
            "Host '{}' is not a supported marketplace",
            host
        )));
    }

    if !sources.is_listing_path(&url) {
        return Err(ApiError::UnsupportedUrl(
            "The URL does not look like a listing page".to_string(),
        ));
    }

    // The url crate already lower-cases the host during parsing
    let normalized_url = url.to_string().trim_end_matches('/').to_string();

    let platform = host
        .trim_start_matches("www.")
        .split('.')
        .next()
        .unwrap_or(&host)
        .to_string();

    let user_context = body
        .user_context
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    Ok(AnalysisRequest {
        url,
        normalized_url,
        platform,
        user_context,
    })
}

/// Configure analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_analysis);
}
