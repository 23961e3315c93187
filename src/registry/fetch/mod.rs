//! Fetching template images from their authoritative source.
//!
//! [`ImageFetcher`] routes by location: `http(s)://` URLs go through
//! [`HttpFetcher`], anything else is read from the local filesystem.

pub mod http;

pub use http::{HttpFetcher, DEFAULT_TIMEOUT};

use std::fs;
use std::io::ErrorKind;

use super::source::{is_remote_url, FetchError, ImageSource};

/// Image source for remote URLs and local paths.
#[derive(Debug, Clone, Default)]
pub struct ImageFetcher {
    http: HttpFetcher,
}

impl ImageFetcher {
    /// Create an image fetcher using the given HTTP client.
    pub fn new(http: HttpFetcher) -> Self {
        Self { http }
    }
}

impl ImageSource for ImageFetcher {
    fn fetch_bytes(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        if is_remote_url(location) {
            return self.http.fetch_bytes(location);
        }

        fs::read(location).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FetchError::NotFound {
                location: location.to_string(),
            },
            _ => FetchError::transport(location, e),
        })
    }
}
