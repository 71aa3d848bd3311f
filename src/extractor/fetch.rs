//! Listing page fetcher
//!
//! Fetch failures are classified into distinct kinds and propagated as typed
//! errors; the extractor never sees partial documents.

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Fetch timed out")]
    Timeout,

    #[error("Upstream returned HTTP {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(String),
}

/// Capability for fetching a listing page as document text
#[async_trait]
pub trait ListingFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// HTTP-backed fetcher with a bounded timeout
pub struct HttpListingFetcher {
    client: reqwest::Client,
}

impl HttpListingFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(FETCH_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

impl Default for HttpListingFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListingFetcher for HttpListingFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        tracing::debug!(url = %url, "Fetching listing page");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Listing fetch returned non-success status");
            return Err(FetchError::Status(status.as_u16()));
        }

        response.text().await.map_err(classify)
    }
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(e.to_string())
    }
}
