//! HTTP fetching.
//!
//! Provides a blocking HTTP client for template images and catalog JSON,
//! mapping HTTP 404 to [`FetchError::NotFound`] and every other failure to
//! [`FetchError::Transport`].

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::registry::source::FetchError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches bytes and JSON over HTTP/HTTPS.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher with the default 15-second timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a new HTTP fetcher with custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(concat!("memeplate/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });
        Self { client, timeout }
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn get(&self, url: &str) -> Result<Response, FetchError> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::transport(url, e))?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(FetchError::NotFound {
                location: url.to_string(),
            }),
            status => Err(FetchError::transport(url, format!("HTTP {}", status))),
        }
    }

    /// Fetch the response body as raw bytes.
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let body = self
            .get(url)?
            .bytes()
            .map_err(|e| FetchError::transport(url, e))?;
        Ok(body.to_vec())
    }

    /// Fetch and deserialize a JSON response body.
    pub fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        self.get(url)?
            .json()
            .map_err(|e| FetchError::transport(url, e))
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}
