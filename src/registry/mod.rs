//! Template registry.
//!
//! Turns a reference string into a [`Template`]:
//! - Local image paths (`./memes/cat.png`, `~/drake.jpg`)
//! - Remote image URLs (`https://example.com/blank.png`)
//! - Catalog IDs (`buzz`), looked up in the memegen catalog
//!
//! # Example
//!
//! ```no_run
//! use memeplate::cache::TemplateCache;
//! use memeplate::registry::TemplateResolver;
//! use std::sync::Arc;
//!
//! let cache = Arc::new(TemplateCache::at("/tmp/memeplate").unwrap());
//! let resolver = TemplateResolver::new("https://api.memegen.link", cache);
//!
//! let template = resolver.resolve("buzz").unwrap();
//! let image = resolver.load_image(&template).unwrap();
//! println!("{} is {}x{}", template.name, image.width(), image.height());
//! ```

pub mod catalog;
pub mod fetch;
pub mod memegen;
pub mod resolver;
pub mod source;
pub mod template;

// Re-exports
pub use catalog::{CatalogEntry, CatalogExample, DEFAULT_LINE_COUNT};
pub use fetch::{HttpFetcher, ImageFetcher};
pub use memegen::{MemegenClient, DEFAULT_API_BASE};
pub use resolver::{Reference, TemplateResolver};
pub use source::{is_remote_url, CatalogSource, FetchError, ImageSource};
pub use template::{
    layout_positions, Align, ImageSlot, Template, TextPosition, TextStyle,
    DEFAULT_TEXT_POSITIONS, IN_MEMORY_SCHEME,
};
