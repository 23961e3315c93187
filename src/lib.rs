//! memeplate - meme template resolution, caching and text fitting.
//!
//! memeplate turns a template reference (a catalog ID, a local image path
//! or an image URL) into a [`Template`] with text slots, caches template
//! images in a two-tier cache, and sizes caption text so it fits its slot.
//!
//! # Modules
//!
//! - [`cache`] - Two-tier (memory LRU + disk) template cache
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings loading, env overrides and validation
//! - [`error`] - Error types and result aliases
//! - [`imaging`] - Image decoding into RGBA pixel buffers
//! - [`meme`] - Caption lines laid out over a template
//! - [`registry`] - Template catalog, fetchers and reference resolution
//! - [`text`] - Wrapping, URL text encoding and shrink-to-fit sizing
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use memeplate::text::{ApproxMetrics, TextLayoutEngine};
//!
//! let engine = TextLayoutEngine::default();
//! let metrics = ApproxMetrics::new(800.0, 600.0).unwrap();
//! let fit = engine.fit("ONE DOES NOT SIMPLY", 1.0, 0.2, &metrics);
//! assert!(fit.fits);
//! assert!(fit.font_size <= 72.0);
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod imaging;
pub mod meme;
pub mod registry;
pub mod text;
pub mod ui;

pub use cache::TemplateCache;
pub use error::{MemeplateError, Result};
pub use meme::{LayoutPreset, Meme, Placement};
pub use registry::{Template, TemplateResolver, TextPosition};
pub use text::{FitParams, FitResult, TextLayoutEngine};
