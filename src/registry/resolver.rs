//! Template resolution.
//!
//! A reference string is classified, in order, as:
//! 1. A local image path (contains a path separator or has an image extension)
//! 2. A remote `http(s)://` URL
//! 3. A catalog ID, looked up in the TTL-gated catalog
//!
//! A path-like reference that does not exist fails immediately; it is never
//! retried as a catalog ID.

use chrono::Duration;
use std::path::Path;
use std::sync::Arc;

use super::catalog::CatalogEntry;
use super::fetch::{HttpFetcher, ImageFetcher};
use super::memegen::MemegenClient;
use super::source::{is_remote_url, CatalogSource, FetchError, ImageSource};
use super::template::{expand_home, layout_positions, Template};
use crate::cache::{default_catalog_ttl, CacheLookup, TemplateCache};
use crate::config::Settings;
use crate::error::{MemeplateError, Result};
use crate::imaging::{has_image_extension, PixelBuffer, IMAGE_EXTENSIONS};

/// A classified template reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference<'a> {
    LocalPath(&'a str),
    Url(&'a str),
    CatalogId(&'a str),
}

impl<'a> Reference<'a> {
    /// Classify `reference` using `image_extensions` for the path heuristic.
    pub fn classify<S: AsRef<str>>(reference: &'a str, image_extensions: &[S]) -> Self {
        let remote = is_remote_url(reference);
        let path_like = reference.contains('/')
            || reference.contains('\\')
            || has_image_extension(Path::new(reference), image_extensions);

        if path_like && !remote {
            Reference::LocalPath(reference)
        } else if remote {
            Reference::Url(reference)
        } else {
            Reference::CatalogId(reference)
        }
    }
}

/// Resolves reference strings into [`Template`]s.
pub struct TemplateResolver {
    api_base: String,
    cache: Arc<TemplateCache>,
    catalog: Box<dyn CatalogSource>,
    images: Box<dyn ImageSource>,
    catalog_ttl: Duration,
    cache_enabled: bool,
    image_extensions: Vec<String>,
}

impl TemplateResolver {
    /// Create a resolver against `api_base` using the HTTP collaborators.
    pub fn new(api_base: impl Into<String>, cache: Arc<TemplateCache>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        let http = HttpFetcher::new();
        Self {
            catalog: Box::new(MemegenClient::new(api_base.clone(), http.clone())),
            images: Box::new(ImageFetcher::new(http)),
            api_base,
            cache,
            catalog_ttl: default_catalog_ttl(),
            cache_enabled: true,
            image_extensions: IMAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Build a resolver from loaded settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let cache = Arc::new(TemplateCache::new(
            settings.cache.dir(),
            settings.cache.max_memory_images,
        )?);
        let http = HttpFetcher::with_timeout(settings.timeout()?);
        let api_base = settings.api_base.trim_end_matches('/').to_string();

        Ok(Self::new(api_base.clone(), cache)
            .with_catalog_source(MemegenClient::new(api_base, http.clone()))
            .with_image_source(ImageFetcher::new(http))
            .with_catalog_ttl(settings.cache.catalog_ttl()?)
            .with_cache_enabled(settings.cache.enabled)
            .with_image_extensions(settings.image_extensions.clone()))
    }

    pub fn with_catalog_source(mut self, source: impl CatalogSource + 'static) -> Self {
        self.catalog = Box::new(source);
        self
    }

    pub fn with_image_source(mut self, source: impl ImageSource + 'static) -> Self {
        self.images = Box::new(source);
        self
    }

    pub fn with_catalog_ttl(mut self, ttl: Duration) -> Self {
        self.catalog_ttl = ttl;
        self
    }

    /// When disabled, the catalog is fetched on every lookup and images
    /// bypass the cache.
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_image_extensions(mut self, extensions: Vec<String>) -> Self {
        self.image_extensions = extensions;
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// The underlying cache, regardless of whether it is enabled.
    pub fn template_cache(&self) -> &TemplateCache {
        &self.cache
    }

    /// The cache to use for lookups, or `None` when caching is disabled.
    pub fn cache(&self) -> Option<&TemplateCache> {
        self.cache_enabled.then_some(self.cache.as_ref())
    }

    /// Resolve a reference with the default slot count for its kind.
    pub fn resolve(&self, reference: &str) -> Result<Template> {
        self.resolve_with_lines(reference, None)
    }

    /// Resolve a reference, optionally overriding its number of text slots.
    pub fn resolve_with_lines(&self, reference: &str, lines: Option<usize>) -> Result<Template> {
        let lines_or_default = lines.unwrap_or(2);
        match Reference::classify(reference, &self.image_extensions) {
            Reference::LocalPath(path) => {
                if !expand_home(path).exists() {
                    return Err(MemeplateError::FileNotFound {
                        path: path.into(),
                    });
                }
                tracing::debug!("Resolved {} as a local image", path);
                Template::from_image(path, lines_or_default, None)
            }
            Reference::Url(url) => {
                tracing::debug!("Resolved {} as a remote image", url);
                Template::from_image(url, lines_or_default, None)
            }
            Reference::CatalogId(id) => {
                let template = self.get(id)?;
                match lines {
                    Some(n) => template.with_text_positions(layout_positions(n)?),
                    None => Ok(template),
                }
            }
        }
    }

    /// Look up a catalog template by ID.
    ///
    /// Falls back to a direct single-item request when the ID is missing from
    /// the listing.
    pub fn get(&self, id: &str) -> Result<Template> {
        let catalog = self.catalog()?;
        if let Some(entry) = catalog.iter().find(|entry| entry.id == id) {
            return Template::from_catalog_entry(entry, &self.api_base);
        }

        tracing::debug!("{} not in catalog listing, trying direct lookup", id);
        match self.catalog.fetch_one(id) {
            Ok(entry) => Template::from_catalog_entry(&entry, &self.api_base),
            Err(FetchError::NotFound { .. }) => Err(MemeplateError::TemplateNotFound {
                id: id.to_string(),
            }),
            Err(FetchError::Transport { location, message }) => {
                Err(MemeplateError::Transport { location, message })
            }
        }
    }

    /// The catalog, from cache when fresh, otherwise fetched and re-cached.
    pub fn catalog(&self) -> Result<Vec<CatalogEntry>> {
        if self.cache_enabled {
            match self.cache.get_catalog(self.catalog_ttl) {
                CacheLookup::Hit(entries) => return Ok(entries),
                CacheLookup::Miss(reason) => {
                    tracing::debug!("Catalog cache miss ({:?})", reason)
                }
            }
        }
        self.fetch_catalog()
    }

    /// Catalog entries whose ID, name or keywords contain `query`.
    pub fn search(&self, query: &str) -> Result<Vec<CatalogEntry>> {
        Ok(self
            .catalog()?
            .into_iter()
            .filter(|entry| entry.matches(query))
            .collect())
    }

    pub fn list_all(&self) -> Result<Vec<CatalogEntry>> {
        self.catalog()
    }

    /// Re-fetch the catalog regardless of its age.
    pub fn refresh(&self) -> Result<Vec<CatalogEntry>> {
        self.fetch_catalog()
    }

    /// Load a template's background image through this resolver's cache and
    /// image source.
    pub fn load_image(&self, template: &Template) -> Result<PixelBuffer> {
        template.get_image(self.cache(), self.images.as_ref())
    }

    fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>> {
        let entries = self
            .catalog
            .list_templates()
            .map_err(|e| match e {
                FetchError::NotFound { location } => MemeplateError::Transport {
                    location,
                    message: "catalog listing not found".to_string(),
                },
                FetchError::Transport { location, message } => {
                    MemeplateError::Transport { location, message }
                }
            })?;
        tracing::debug!("Fetched catalog with {} entries", entries.len());

        if self.cache_enabled {
            if let Err(e) = self.cache.set_catalog(entries.clone()) {
                tracing::warn!("Failed to cache catalog: {}", e);
            }
        }
        Ok(entries)
    }
}

impl std::fmt::Debug for TemplateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateResolver")
            .field("api_base", &self.api_base)
            .field("cache_root", &self.cache.root())
            .field("catalog_ttl", &self.catalog_ttl)
            .field("cache_enabled", &self.cache_enabled)
            .finish_non_exhaustive()
    }
}
