//! Collaborator interfaces for image bytes and catalog metadata.
//!
//! The resolver and [`Template`](super::Template) only see these traits, so
//! the HTTP implementations in [`fetch`](super::fetch) and
//! [`memegen`](super::memegen) can be swapped for in-memory fakes.

use thiserror::Error;

use super::catalog::CatalogEntry;

/// URL prefixes treated as remote locations.
pub const URL_SCHEMES: &[&str] = &["http://", "https://"];

/// Whether `location` starts with a recognized URL scheme.
pub fn is_remote_url(location: &str) -> bool {
    URL_SCHEMES.iter().any(|scheme| location.starts_with(scheme))
}

/// Failure reported by a collaborator.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source has nothing at this location.
    #[error("not found: {location}")]
    NotFound { location: String },

    /// The source could not be reached or returned an error.
    #[error("failed to fetch {location}: {message}")]
    Transport { location: String, message: String },
}

impl FetchError {
    /// Build a transport error from any displayable cause.
    pub fn transport(location: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::Transport {
            location: location.into(),
            message: cause.to_string(),
        }
    }

    /// Whether this is a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Supplies raw image bytes for a URL or local path.
pub trait ImageSource: Send + Sync {
    fn fetch_bytes(&self, location: &str) -> Result<Vec<u8>, FetchError>;
}

/// Supplies catalog metadata.
pub trait CatalogSource: Send + Sync {
    /// The full catalog listing.
    fn list_templates(&self) -> Result<Vec<CatalogEntry>, FetchError>;

    /// A single entry by ID, independent of the listing.
    fn fetch_one(&self, id: &str) -> Result<CatalogEntry, FetchError>;
}
