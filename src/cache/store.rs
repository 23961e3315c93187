//! On-disk cache storage.
//!
//! Layout under the cache root:
//!
//! ```text
//! <root>/catalog.json     fetched_at + catalog entries
//! <root>/images/<key>     raw image bytes, one file per source URL
//! ```

use chrono::Duration;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::entry::{CacheLookup, CatalogSnapshot, MissReason};
use crate::registry::catalog::CatalogEntry;

/// Name of the catalog file within the cache root.
const CATALOG_FILENAME: &str = "catalog.json";

/// Name of the image directory within the cache root.
const IMAGES_DIRNAME: &str = "images";

/// Length of a cache key in hex characters.
pub const KEY_LEN: usize = 16;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Derive the cache key for a source URL or path.
///
/// First 16 hex characters of the SHA-256 of the source string.
pub fn image_key(source: &str) -> String {
    let hash = Sha256::digest(source.as_bytes());
    hex::encode(&hash[..KEY_LEN / 2])
}

/// Storage for cached images and the catalog snapshot.
#[derive(Debug, Clone)]
pub struct DiskStore {
    /// Root directory for cache.
    root: PathBuf,
}

impl DiskStore {
    /// Create a new disk store rooted at `root`. Nothing is created yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding cached image bytes.
    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIRNAME)
    }

    /// Path of the cached image file for `key`.
    pub fn image_path(&self, key: &str) -> PathBuf {
        self.images_dir().join(key)
    }

    /// Path of the catalog file.
    pub fn catalog_path(&self) -> PathBuf {
        self.root.join(CATALOG_FILENAME)
    }

    /// Read cached image bytes.
    pub fn get_image_bytes(&self, key: &str) -> CacheLookup<Vec<u8>> {
        match fs::read(self.image_path(key)) {
            Ok(bytes) => CacheLookup::Hit(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => CacheLookup::Miss(MissReason::Absent),
            Err(e) => {
                tracing::debug!("Unreadable cached image {}: {}", key, e);
                CacheLookup::Miss(MissReason::Corrupt)
            }
        }
    }

    /// Store image bytes under `key`.
    pub fn put_image_bytes(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        write_atomic(&self.image_path(key), bytes)
    }

    /// Load the catalog if present, parseable, and younger than `ttl`.
    pub fn get_catalog(&self, ttl: Duration) -> CacheLookup<CatalogSnapshot> {
        let content = match fs::read_to_string(self.catalog_path()) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return CacheLookup::Miss(MissReason::Absent)
            }
            Err(e) => {
                tracing::debug!("Unreadable catalog cache: {}", e);
                return CacheLookup::Miss(MissReason::Corrupt);
            }
        };

        let snapshot: CatalogSnapshot = match serde_json::from_str(&content) {
            Ok(s) => s,
            Err(e) => {
                tracing::debug!("Corrupt catalog cache: {}", e);
                return CacheLookup::Miss(MissReason::Corrupt);
            }
        };

        if snapshot.is_expired(ttl) {
            return CacheLookup::Miss(MissReason::Expired);
        }
        CacheLookup::Hit(snapshot)
    }

    /// Overwrite the catalog with `templates`, stamped with the current time.
    pub fn put_catalog(&self, templates: Vec<CatalogEntry>) -> io::Result<CatalogSnapshot> {
        let snapshot = CatalogSnapshot::new(templates);
        self.put_catalog_snapshot(&snapshot)?;
        Ok(snapshot)
    }

    /// Overwrite the catalog with an existing snapshot.
    pub fn put_catalog_snapshot(&self, snapshot: &CatalogSnapshot) -> io::Result<()> {
        let json = serde_json::to_string(snapshot)?;
        write_atomic(&self.catalog_path(), json.as_bytes())
    }

    /// Remove the whole cache directory tree.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_dir_all(&self.root) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Number of cached images and their total size in bytes.
    pub fn image_usage(&self) -> io::Result<(usize, u64)> {
        let dir = match fs::read_dir(self.images_dir()) {
            Ok(d) => d,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok((0, 0)),
            Err(e) => return Err(e),
        };

        let mut count = 0;
        let mut total = 0;
        for entry in dir {
            let entry = entry?;
            let name = entry.file_name();
            if is_temp_name(&name.to_string_lossy()) {
                continue;
            }
            let meta = entry.metadata()?;
            if meta.is_file() {
                count += 1;
                total += meta.len();
            }
        }
        Ok((count, total))
    }
}

fn is_temp_name(name: &str) -> bool {
    name.ends_with(".tmp")
}

/// Write-to-temp-then-rename so readers never see a partial file.
///
/// The temp name is unique per process and call, so concurrent writers of
/// the same key never share a temp file; the last rename wins.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| io::Error::new(ErrorKind::InvalidInput, "cache path has no parent"))?;
    fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let temp_path = dir.join(format!(
        ".{}.{}.{}.tmp",
        file_name,
        std::process::id(),
        seq
    ));

    fs::write(&temp_path, bytes)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, DiskStore) {
        let temp = TempDir::new().unwrap();
        let store = DiskStore::new(temp.path().join("cache"));
        (temp, store)
    }

    #[test]
    fn image_key_is_short_hex_and_deterministic() {
        let key = image_key("https://example.com/test.png");
        assert_eq!(key.len(), KEY_LEN);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, image_key("https://example.com/test.png"));
    }

    #[test]
    fn different_sources_have_different_keys() {
        assert_ne!(
            image_key("https://example.com/a.png"),
            image_key("https://example.com/b.png")
        );
    }

    #[test]
    fn image_key_matches_sha256_prefix() {
        // sha256("abc") = ba7816bf8f01cfea...
        assert_eq!(image_key("abc"), "ba7816bf8f01cfea");
    }

    #[test]
    fn missing_image_is_absent() {
        let (_temp, store) = setup_store();
        assert_eq!(
            store.get_image_bytes("0123456789abcdef"),
            CacheLookup::Miss(MissReason::Absent)
        );
    }

    #[test]
    fn put_and_get_image_bytes() {
        let (_temp, store) = setup_store();
        store.put_image_bytes("abc", b"not really a png").unwrap();

        assert_eq!(
            store.get_image_bytes("abc"),
            CacheLookup::Hit(b"not really a png".to_vec())
        );
        assert!(store.images_dir().join("abc").exists());
    }

    #[test]
    fn put_leaves_no_temp_files() {
        let (_temp, store) = setup_store();
        store.put_image_bytes("abc", b"one").unwrap();
        store.put_image_bytes("abc", b"two").unwrap();

        let names: Vec<String> = fs::read_dir(store.images_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["abc".to_string()]);
        assert_eq!(store.get_image_bytes("abc").hit().unwrap(), b"two");
    }

    #[test]
    fn catalog_missing_is_absent() {
        let (_temp, store) = setup_store();
        assert_eq!(
            store.get_catalog(Duration::hours(24)).miss_reason(),
            Some(MissReason::Absent)
        );
    }

    #[test]
    fn catalog_store_and_retrieve() {
        let (_temp, store) = setup_store();
        store
            .put_catalog(vec![CatalogEntry::new("buzz", "Buzz")])
            .unwrap();

        let snapshot = store.get_catalog(Duration::hours(24)).hit().unwrap();
        assert_eq!(snapshot.templates.len(), 1);
        assert_eq!(snapshot.templates[0].id, "buzz");
    }

    #[test]
    fn catalog_older_than_ttl_is_expired() {
        let (_temp, store) = setup_store();
        let old = CatalogSnapshot::fetched_at(
            Utc::now() - Duration::seconds(100_000),
            vec![CatalogEntry::new("buzz", "Buzz")],
        );
        store.put_catalog_snapshot(&old).unwrap();

        assert_eq!(
            store.get_catalog(Duration::seconds(86_400)).miss_reason(),
            Some(MissReason::Expired)
        );
        assert!(store.get_catalog(Duration::seconds(200_000)).is_hit());
    }

    #[test]
    fn corrupted_catalog_is_a_miss() {
        let (_temp, store) = setup_store();
        fs::create_dir_all(store.root()).unwrap();
        fs::write(store.catalog_path(), "not valid json{{{").unwrap();

        assert_eq!(
            store.get_catalog(Duration::hours(24)).miss_reason(),
            Some(MissReason::Corrupt)
        );
    }

    #[test]
    fn catalog_without_timestamp_is_a_miss() {
        let (_temp, store) = setup_store();
        fs::create_dir_all(store.root()).unwrap();
        fs::write(store.catalog_path(), r#"{"templates": []}"#).unwrap();

        assert!(!store.get_catalog(Duration::hours(24)).is_hit());
    }

    #[test]
    fn dirs_created_on_put() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("new").join("nested").join("cache");
        let store = DiskStore::new(&root);

        assert!(!root.exists());
        store.put_catalog(vec![]).unwrap();
        assert!(root.join(CATALOG_FILENAME).exists());
    }

    #[test]
    fn clear_removes_tree() {
        let (_temp, store) = setup_store();
        store.put_catalog(vec![]).unwrap();
        store.put_image_bytes("abc", b"bytes").unwrap();

        store.clear().unwrap();
        assert!(!store.root().exists());
    }

    #[test]
    fn clear_missing_root_is_ok() {
        let (_temp, store) = setup_store();
        assert!(store.clear().is_ok());
    }

    #[test]
    fn image_usage_counts_files() {
        let (_temp, store) = setup_store();
        assert_eq!(store.image_usage().unwrap(), (0, 0));

        store.put_image_bytes("a", b"12345").unwrap();
        store.put_image_bytes("b", b"1234567890").unwrap();

        assert_eq!(store.image_usage().unwrap(), (2, 15));
    }
}
