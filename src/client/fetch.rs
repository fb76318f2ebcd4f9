//! Transport used by the update checker

use super::error::{ClientError, ClientResult};
use std::time::Duration;

/// Default timeout for a single update check
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches the body of the version endpoint
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> ClientResult<String>;
}

/// reqwest-backed fetcher. Sends `Cache-Control: no-cache` so intermediaries
/// revalidate.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> ClientResult<Self> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network {
                url: String::new(),
                cause: format!("failed to create HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }

    /// Use a preconfigured client (proxies, TLS roots, headers)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> ClientResult<String> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl {
                url: url.to_string(),
            });
        }

        let response = self
            .client
            .get(url)
            .header("Cache-Control", "no-cache")
            .send()
            .await
            .map_err(|e| ClientError::Network {
                url: url.to_string(),
                cause: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| ClientError::Network {
            url: url.to_string(),
            cause: format!("failed to read response body: {}", e),
        })
    }
}
