//! Settings loading and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery, loading and environment overrides in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use memeplate::config::{parse_settings, validate};
//! use std::path::Path;
//!
//! let settings = parse_settings("cache:\n  catalog_ttl: 1h\n", Path::new("config.yml")).unwrap();
//! validate(&settings).unwrap();
//! assert_eq!(settings.cache.catalog_ttl().unwrap().num_minutes(), 60);
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    apply_env_overrides, load_settings, load_settings_file, parse_settings, user_config_path,
    ENV_API_BASE, ENV_CACHE_DIR, ENV_NO_CACHE,
};
pub use schema::{CacheSettings, Settings};
pub use validator::{validate, validate_settings, ValidationError};
