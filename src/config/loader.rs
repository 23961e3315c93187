//! Settings discovery and loading.
//!
//! Settings come from, in order:
//! 1. An explicit `--config` path, which must exist
//! 2. `<config dir>/memeplate/config.yml`, if present
//! 3. Built-in defaults
//!
//! Environment overrides are applied on top of whichever was found.

use std::fs;
use std::path::{Path, PathBuf};

use super::schema::Settings;
use super::validator::validate;
use crate::error::{MemeplateError, Result};

/// Overrides `api_base`.
pub const ENV_API_BASE: &str = "MEMEPLATE_API_BASE";
/// Overrides `cache.dir`.
pub const ENV_CACHE_DIR: &str = "MEMEPLATE_CACHE_DIR";
/// Disables the cache when set to anything but empty, `0` or `false`.
pub const ENV_NO_CACHE: &str = "MEMEPLATE_NO_CACHE";

/// The per-user settings file location, whether or not it exists.
pub fn user_config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("memeplate").join("config.yml"))
}

/// Load, override from the process environment, and validate settings.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let mut settings = match explicit {
        Some(path) => load_settings_file(path)?,
        None => match user_config_path().filter(|p| p.exists()) {
            Some(path) => load_settings_file(&path)?,
            None => Settings::default(),
        },
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    validate(&settings)?;
    Ok(settings)
}

/// Load settings from a YAML file.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MemeplateError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            MemeplateError::Io(e)
        }
    })?;

    tracing::debug!("Loading settings from {}", path.display());
    parse_settings(&content, path)
}

/// Parse YAML content into settings.
///
/// An empty document yields the defaults.
pub fn parse_settings(content: &str, source_path: &Path) -> Result<Settings> {
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(content).map_err(|e| MemeplateError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Apply `MEMEPLATE_*` overrides read through `lookup`.
pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(api_base) = non_empty(ENV_API_BASE) {
        settings.api_base = api_base;
    }
    if let Some(dir) = non_empty(ENV_CACHE_DIR) {
        settings.cache.dir = Some(PathBuf::from(dir));
    }
    if let Some(flag) = non_empty(ENV_NO_CACHE) {
        let flag = flag.trim().to_ascii_lowercase();
        if flag != "0" && flag != "false" {
            settings.cache.enabled = false;
        }
    }
}
