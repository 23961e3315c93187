//! Error types for memeplate operations.
//!
//! This module defines [`MemeplateError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Missing templates and missing files are explicit, typed failures
//! - Corrupt cache contents never reach this type; the cache layer reports
//!   them as a [`CacheLookup::Miss`](crate::cache::CacheLookup::Miss)
//! - Use `anyhow::Error` (via `MemeplateError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for memeplate operations.
#[derive(Debug, Error)]
pub enum MemeplateError {
    /// Catalog ID absent after the full lookup fallback.
    #[error("Template '{id}' not found")]
    TemplateNotFound { id: String },

    /// A path-like template reference that does not exist on disk.
    #[error("Template image file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The authoritative image source has no image at this location.
    #[error("Image not found: {location}")]
    ImageNotFound { location: String },

    /// Fetching from the external source failed.
    #[error("Failed to fetch {location}: {message}")]
    Transport { location: String, message: String },

    /// Bytes from the authoritative source are not a readable image.
    #[error("Failed to decode image from {location}: {message}")]
    Decode { location: String, message: String },

    /// Invalid construction parameters or settings.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Settings file not found at an explicitly requested location.
    #[error("Configuration not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse the settings file.
    #[error("Failed to parse config at {}: {message}", path.display())]
    ConfigParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MemeplateError {
    /// Shorthand for an [`InvalidConfig`](Self::InvalidConfig) error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Result type alias for memeplate operations.
pub type Result<T> = std::result::Result<T, MemeplateError>;
