//! Cache lookup results and the catalog snapshot record.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::registry::catalog::CatalogEntry;

/// Outcome of a cache lookup.
///
/// A miss is an ordinary value, not an error: the caller falls through to
/// the next tier or to the authoritative source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<T> {
    /// The value was found and is usable.
    Hit(T),
    /// The value is unavailable for the given reason.
    Miss(MissReason),
}

/// Why a lookup missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    /// Nothing is stored under the key.
    Absent,
    /// A catalog snapshot exists but is older than the TTL.
    Expired,
    /// Stored bytes could not be read, parsed or decoded.
    Corrupt,
}

impl<T> CacheLookup<T> {
    /// Convert into an `Option`, discarding the miss reason.
    pub fn hit(self) -> Option<T> {
        match self {
            CacheLookup::Hit(value) => Some(value),
            CacheLookup::Miss(_) => None,
        }
    }

    /// Whether this lookup found a value.
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    /// The miss reason, if this lookup missed.
    pub fn miss_reason(&self) -> Option<MissReason> {
        match self {
            CacheLookup::Hit(_) => None,
            CacheLookup::Miss(reason) => Some(*reason),
        }
    }

    /// Map the hit value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CacheLookup<U> {
        match self {
            CacheLookup::Hit(value) => CacheLookup::Hit(f(value)),
            CacheLookup::Miss(reason) => CacheLookup::Miss(reason),
        }
    }
}

/// A time-stamped copy of the full template catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// When the catalog was fetched from the authoritative source.
    pub fetched_at: DateTime<Utc>,
    /// Catalog entries in source order.
    pub templates: Vec<CatalogEntry>,
}

impl CatalogSnapshot {
    /// Snapshot the given entries with the current time.
    pub fn new(templates: Vec<CatalogEntry>) -> Self {
        Self::fetched_at(Utc::now(), templates)
    }

    /// Snapshot the given entries with an explicit fetch time.
    pub fn fetched_at(fetched_at: DateTime<Utc>, templates: Vec<CatalogEntry>) -> Self {
        Self {
            fetched_at,
            templates,
        }
    }

    /// Age of this snapshot.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.fetched_at)
    }

    /// Whether this snapshot has outlived `ttl`.
    ///
    /// A snapshot exactly `ttl` old counts as expired.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }
}
