//! Template caching system.
//!
//! Two tiers for decoded template images (a bounded in-memory LRU in
//! [`memory`] backed by an unbounded on-disk store in [`store`]) plus a
//! TTL-gated copy of the template catalog. [`TemplateCache`] composes them.

pub mod entry;
pub mod memory;
pub mod store;
pub mod template_cache;
pub mod validation;

pub use entry::{CacheLookup, CatalogSnapshot, MissReason};
pub use memory::{KeyedLru, DEFAULT_MAX_ENTRIES};
pub use store::{image_key, DiskStore};
pub use template_cache::{default_catalog_ttl, CacheStats, TemplateCache};
pub use validation::{format_duration, parse_duration};

/// Get the default cache directory.
pub fn default_cache_dir() -> std::path::PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("memeplate")
}
