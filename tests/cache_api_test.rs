//! Two-tier cache behavior through the public API.

use std::fs;
use std::io::Cursor;
use std::sync::Arc;
use std::thread;

use chrono::Duration;
use image::{ImageFormat, Rgba, RgbaImage};
use memeplate::cache::{image_key, CacheLookup, MissReason, TemplateCache};
use memeplate::registry::CatalogEntry;
use tempfile::TempDir;

const URL: &str = "https://api.example.com/images/buzz.png";

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 255]))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn disk_tier_survives_a_new_cache() {
    let temp = TempDir::new().unwrap();
    TemplateCache::new(temp.path(), 2)
        .unwrap()
        .set_image(URL, &png(6, 4))
        .unwrap();

    let reopened = TemplateCache::new(temp.path(), 2).unwrap();
    assert!(!reopened.memory().contains(&image_key(URL)));

    let image = reopened.get_image(URL).hit().unwrap();
    assert_eq!(image.dimensions(), (6, 4));
    assert!(reopened.memory().contains(&image_key(URL)));
}

#[test]
fn corrupt_disk_entry_is_a_miss() {
    let temp = TempDir::new().unwrap();
    let cache = TemplateCache::new(temp.path(), 2).unwrap();
    fs::create_dir_all(cache.store().images_dir()).unwrap();
    fs::write(cache.store().image_path(&image_key(URL)), b"garbage").unwrap();

    let lookup = cache.get_image(URL);
    assert!(!lookup.is_hit());
    assert_eq!(lookup.miss_reason(), Some(MissReason::Corrupt));
}

#[test]
fn catalog_ttl_controls_freshness() {
    let temp = TempDir::new().unwrap();
    let cache = TemplateCache::new(temp.path(), 2).unwrap();
    cache
        .set_catalog(vec![CatalogEntry::new("buzz", "Buzz")])
        .unwrap();

    let fresh = cache.get_catalog(Duration::hours(1));
    assert_eq!(fresh.hit().unwrap()[0].id, "buzz");

    assert!(matches!(
        cache.get_catalog(Duration::zero()),
        CacheLookup::Miss(MissReason::Expired)
    ));
}

#[test]
fn concurrent_readers_share_one_cache() {
    let temp = TempDir::new().unwrap();
    let cache = Arc::new(TemplateCache::new(temp.path(), 4).unwrap());
    cache.set_image(URL, &png(3, 3)).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.get_image(URL).hit().map(|img| img.dimensions()))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some((3, 3)));
    }
}

#[test]
fn clear_then_stats() {
    let temp = TempDir::new().unwrap();
    let cache = TemplateCache::new(temp.path().join("cache"), 2).unwrap();
    cache.set_image(URL, &png(2, 2)).unwrap();
    assert_eq!(cache.stats().unwrap().disk_images, 1);

    cache.clear().unwrap();
    let stats = cache.stats().unwrap();
    assert_eq!(stats.disk_images, 0);
    assert_eq!(stats.memory_images, 0);
    assert!(stats.catalog_age.is_none());
}
