//! Settings validation.
//!
//! All problems are collected so a user can fix them in one pass.

use super::schema::Settings;
use crate::error::{MemeplateError, Result};
use crate::registry::is_remote_url;

/// A single settings problem.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Settings key, e.g. `cache.catalog_ttl`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Check settings and return every problem found.
pub fn validate_settings(settings: &Settings) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !is_remote_url(&settings.api_base) {
        errors.push(ValidationError::new(
            "api_base",
            format!("'{}' must be an http(s) URL", settings.api_base),
        ));
    }

    match settings.timeout() {
        Ok(timeout) if timeout.is_zero() => {
            errors.push(ValidationError::new("timeout", "must be greater than zero"))
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new("timeout", e.to_string())),
    }

    if settings.image_extensions.is_empty() {
        errors.push(ValidationError::new("image_extensions", "must not be empty"));
    }

    if let Err(e) = settings.cache.catalog_ttl() {
        errors.push(ValidationError::new("cache.catalog_ttl", e.to_string()));
    }

    if settings.cache.max_memory_images == 0 {
        errors.push(ValidationError::new(
            "cache.max_memory_images",
            "must be at least 1",
        ));
    }

    if let Err(e) = settings.fit.validate() {
        errors.push(ValidationError::new("fit", e.to_string()));
    }

    errors
}

/// Validate settings, failing with all problems joined into one message.
pub fn validate(settings: &Settings) -> Result<()> {
    let errors = validate_settings(settings);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        Err(MemeplateError::invalid_config(messages.join("; ")))
    }
}
