//! Two-tier template cache.
//!
//! Images are looked up in memory first, then on disk. A disk hit is decoded
//! and promoted into memory so the next lookup never touches the disk.
//! Writes always go to both tiers.
//!
//! The catalog lives on disk with a TTL, fronted by a single in-process slot
//! so a process reads the catalog file at most once while it stays fresh.

use chrono::Duration;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::entry::{CacheLookup, CatalogSnapshot, MissReason};
use super::memory::{KeyedLru, DEFAULT_MAX_ENTRIES};
use super::store::{image_key, DiskStore};
use crate::error::Result;
use crate::imaging::{decode_rgba, PixelBuffer};
use crate::registry::catalog::CatalogEntry;

/// Default catalog time-to-live: 24 hours.
pub fn default_catalog_ttl() -> Duration {
    Duration::hours(24)
}

/// In-memory LRU plus on-disk store for template images and the catalog.
#[derive(Debug)]
pub struct TemplateCache {
    memory: KeyedLru,
    store: DiskStore,
    catalog: Mutex<Option<CatalogSnapshot>>,
}

impl TemplateCache {
    /// Create a cache rooted at `root` holding up to `max_memory` decoded
    /// images in memory.
    pub fn new(root: impl Into<PathBuf>, max_memory: usize) -> Result<Self> {
        Ok(Self {
            memory: KeyedLru::new(max_memory)?,
            store: DiskStore::new(root),
            catalog: Mutex::new(None),
        })
    }

    /// Create a cache rooted at `root` with the default memory capacity.
    pub fn at(root: impl Into<PathBuf>) -> Result<Self> {
        Self::new(root, DEFAULT_MAX_ENTRIES)
    }

    /// Cache root directory.
    pub fn root(&self) -> &Path {
        self.store.root()
    }

    /// The disk tier.
    pub fn store(&self) -> &DiskStore {
        &self.store
    }

    /// The memory tier.
    pub fn memory(&self) -> &KeyedLru {
        &self.memory
    }

    /// Look up a decoded image by its source URL or path.
    pub fn get_image(&self, url: &str) -> CacheLookup<PixelBuffer> {
        let key = image_key(url);

        if let Some(image) = self.memory.get(&key) {
            tracing::debug!("Memory cache hit for {}", url);
            return CacheLookup::Hit(image);
        }

        let bytes = match self.store.get_image_bytes(&key) {
            CacheLookup::Hit(bytes) => bytes,
            CacheLookup::Miss(reason) => return CacheLookup::Miss(reason),
        };

        match decode_rgba(&bytes) {
            Ok(image) => {
                tracing::debug!("Disk cache hit for {}, promoting to memory", url);
                self.memory.put(key, image.clone());
                CacheLookup::Hit(image)
            }
            Err(e) => {
                tracing::debug!("Discarding undecodable cached image for {}: {}", url, e);
                CacheLookup::Miss(MissReason::Corrupt)
            }
        }
    }

    /// Store raw image bytes for `url` in both tiers.
    ///
    /// Returns the decoded image, or a `Corrupt` miss when the bytes cannot
    /// be decoded; in that case the bytes are still on disk and the next
    /// lookup reports the same miss.
    pub fn set_image(&self, url: &str, bytes: &[u8]) -> io::Result<CacheLookup<PixelBuffer>> {
        let key = image_key(url);
        self.store.put_image_bytes(&key, bytes)?;

        Ok(match decode_rgba(bytes) {
            Ok(image) => {
                self.memory.put(key, image.clone());
                CacheLookup::Hit(image)
            }
            Err(e) => {
                tracing::debug!("Cached bytes for {} do not decode: {}", url, e);
                CacheLookup::Miss(MissReason::Corrupt)
            }
        })
    }

    /// Store bytes the caller has already decoded into `image`.
    pub fn put_decoded(&self, url: &str, bytes: &[u8], image: PixelBuffer) -> io::Result<()> {
        let key = image_key(url);
        self.store.put_image_bytes(&key, bytes)?;
        self.memory.put(key, image);
        Ok(())
    }

    /// Load the catalog if a snapshot younger than `ttl` exists.
    pub fn get_catalog(&self, ttl: Duration) -> CacheLookup<Vec<CatalogEntry>> {
        {
            let slot = self.catalog.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(snapshot) = slot.as_ref() {
                if !snapshot.is_expired(ttl) {
                    return CacheLookup::Hit(snapshot.templates.clone());
                }
            }
        }

        match self.store.get_catalog(ttl) {
            CacheLookup::Hit(snapshot) => {
                let templates = snapshot.templates.clone();
                *self.catalog.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
                CacheLookup::Hit(templates)
            }
            CacheLookup::Miss(reason) => CacheLookup::Miss(reason),
        }
    }

    /// Replace the catalog on disk and in the in-process slot.
    pub fn set_catalog(&self, templates: Vec<CatalogEntry>) -> io::Result<()> {
        let snapshot = self.store.put_catalog(templates)?;
        *self.catalog.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
        Ok(())
    }

    /// Drop both tiers and the catalog.
    pub fn clear(&self) -> io::Result<()> {
        self.memory.clear();
        *self.catalog.lock().unwrap_or_else(PoisonError::into_inner) = None;
        self.store.clear()
    }

    /// Snapshot of cache occupancy.
    pub fn stats(&self) -> io::Result<CacheStats> {
        let (disk_images, disk_bytes) = self.store.image_usage()?;
        let catalog_age = match self.store.get_catalog(Duration::MAX) {
            CacheLookup::Hit(snapshot) => Some(snapshot.age()),
            CacheLookup::Miss(_) => None,
        };
        Ok(CacheStats {
            memory_images: self.memory.len(),
            memory_capacity: self.memory.max_entries(),
            disk_images,
            disk_bytes,
            catalog_age,
        })
    }
}

/// Occupancy of a [`TemplateCache`].
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub memory_images: usize,
    pub memory_capacity: usize,
    pub disk_images: usize,
    pub disk_bytes: u64,
    /// Age of the on-disk catalog, if one is readable.
    pub catalog_age: Option<Duration>,
}
