//! Catalog client for memegen-compatible APIs.
//!
//! Endpoints:
//! - `GET {api_base}/templates/` - full catalog listing
//! - `GET {api_base}/templates/{id}` - one entry

use super::catalog::CatalogEntry;
use super::fetch::HttpFetcher;
use super::source::{CatalogSource, FetchError};

/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.memegen.link";

/// Catalog source backed by the memegen HTTP API.
#[derive(Debug, Clone)]
pub struct MemegenClient {
    api_base: String,
    http: HttpFetcher,
}

impl MemegenClient {
    /// Create a client for `api_base` (trailing slashes are ignored).
    pub fn new(api_base: impl Into<String>, http: HttpFetcher) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self { api_base, http }
    }

    /// The normalized API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn listing_url(&self) -> String {
        format!("{}/templates/", self.api_base)
    }

    fn entry_url(&self, id: &str) -> String {
        format!("{}/templates/{}", self.api_base, id)
    }
}

impl Default for MemegenClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE, HttpFetcher::new())
    }
}

impl CatalogSource for MemegenClient {
    fn list_templates(&self) -> Result<Vec<CatalogEntry>, FetchError> {
        let entries: Vec<CatalogEntry> = self.http.fetch_json(&self.listing_url())?;
        tracing::debug!("Fetched catalog with {} templates", entries.len());
        Ok(entries)
    }

    fn fetch_one(&self, id: &str) -> Result<CatalogEntry, FetchError> {
        self.http.fetch_json(&self.entry_url(id))
    }
}
