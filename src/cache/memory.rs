//! Bounded in-memory image tier.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{MemeplateError, Result};
use crate::imaging::PixelBuffer;

/// Default number of decoded images kept in memory.
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// In-memory LRU mapping cache keys to decoded images.
///
/// Reads promote entries, so every access goes through a single mutex.
pub struct KeyedLru {
    entries: Mutex<LruCache<String, PixelBuffer>>,
    max_entries: NonZeroUsize,
}

impl KeyedLru {
    /// Create an LRU holding at most `max_entries` images.
    pub fn new(max_entries: usize) -> Result<Self> {
        let max_entries = NonZeroUsize::new(max_entries).ok_or_else(|| {
            MemeplateError::invalid_config("in-memory cache capacity must be at least 1")
        })?;
        Ok(Self {
            entries: Mutex::new(LruCache::new(max_entries)),
            max_entries,
        })
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, PixelBuffer>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up `key`, marking it most recently used on a hit.
    pub fn get(&self, key: &str) -> Option<PixelBuffer> {
        self.lock().get(key).cloned()
    }

    /// Insert or refresh `key`.
    ///
    /// Evicts the single least recently used entry when the insert pushes
    /// the cache over capacity.
    pub fn put(&self, key: impl Into<String>, image: PixelBuffer) {
        let key = key.into();
        if let Some((evicted, _)) = self.lock().push(key.clone(), image) {
            if evicted != key {
                tracing::debug!("Evicted {} from memory cache", evicted);
            }
        }
    }

    /// Whether `key` is resident, without touching recency.
    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains(key)
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured capacity.
    pub fn max_entries(&self) -> usize {
        self.max_entries.get()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl std::fmt::Debug for KeyedLru {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedLru")
            .field("len", &self.len())
            .field("max_entries", &self.max_entries)
            .finish()
    }
}
