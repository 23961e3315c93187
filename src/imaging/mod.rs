//! Image decoding for template backgrounds.
//!
//! Every template image, whatever its source format, ends up as an
//! [`RgbaImage`]: height × width × 4 channels, 8 bits each, row-major,
//! no padding. Decoding goes through the `image` crate, which sniffs the
//! format from the bytes, so cached files need no extension.

use image::RgbaImage;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// A decoded, shareable RGBA8 image.
pub type PixelBuffer = Arc<RgbaImage>;

/// File extensions treated as images when classifying template references.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tiff", "webp"];

#[derive(Error, Debug)]
#[error("{0}")]
pub struct DecodeError(String);

/// Decode raw image bytes into an RGBA8 buffer.
pub fn decode_rgba(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    let image = image::load_from_memory(bytes).map_err(|e| DecodeError(e.to_string()))?;
    Ok(Arc::new(image.into_rgba8()))
}

/// Whether `path` ends in one of `extensions`, ignoring case.
pub fn has_image_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|known| known.as_ref().eq_ignore_ascii_case(ext)))
}
