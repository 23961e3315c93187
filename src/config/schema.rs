//! Settings schema.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cache::{default_cache_dir, parse_duration, DEFAULT_MAX_ENTRIES};
use crate::error::{MemeplateError, Result};
use crate::imaging::IMAGE_EXTENSIONS;
use crate::registry::DEFAULT_API_BASE;
use crate::text::FitParams;

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the memegen-compatible catalog API.
    pub api_base: String,

    /// HTTP request timeout, e.g. "15s".
    pub timeout: String,

    /// Extensions that mark a reference as a local image path.
    pub image_extensions: Vec<String>,

    pub cache: CacheSettings,

    pub fit: FitParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: "15s".to_string(),
            image_extensions: IMAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            cache: CacheSettings::default(),
            fit: FitParams::default(),
        }
    }
}

impl Settings {
    /// The request timeout as a std duration.
    pub fn timeout(&self) -> Result<std::time::Duration> {
        parse_duration(&self.timeout)
            .and_then(|d| Ok(d.to_std()?))
            .map_err(|e| {
                MemeplateError::invalid_config(format!("timeout '{}': {}", self.timeout, e))
            })
    }

    /// Validated fit parameters.
    pub fn fit_params(&self) -> Result<FitParams> {
        self.fit.validate()?;
        Ok(self.fit)
    }
}

/// Cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// When false, the catalog is fetched on every lookup.
    pub enabled: bool,

    /// Cache root; the platform cache directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// How long a cached catalog stays fresh, e.g. "24h".
    pub catalog_ttl: String,

    /// Decoded images kept in memory.
    pub max_memory_images: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
            catalog_ttl: "24h".to_string(),
            max_memory_images: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl CacheSettings {
    /// Resolved cache root.
    pub fn dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(default_cache_dir)
    }

    pub fn catalog_ttl(&self) -> Result<chrono::Duration> {
        parse_duration(&self.catalog_ttl).map_err(|e| {
            MemeplateError::invalid_config(format!("catalog_ttl '{}': {}", self.catalog_ttl, e))
        })
    }
}
