//! Text preparation and sizing.
//!
//! - [`wrap`]: greedy word wrapping, sized from the box width
//! - [`encoding`]: text styles and memegen URL escaping
//! - [`layout`]: the shrink-to-fit engine and its measurement interface

pub mod encoding;
pub mod layout;
pub mod wrap;

pub use encoding::{apply_style, decode_text_from_url, encode_text_for_url};
pub use layout::{
    auto_font_size, ApproxMetrics, Extent, FitParams, FitResult, Measure, TextLayoutEngine,
};
pub use wrap::{smart_wrap, wrap_text};
