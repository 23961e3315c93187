//! Template and text slot definitions.
//!
//! A [`Template`] is a background image plus an ordered list of
//! [`TextPosition`] slots. All slot coordinates are fractions of the image
//! size with `(0, 0)` at the top-left corner.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

use super::catalog::CatalogEntry;
use super::source::{is_remote_url, FetchError, ImageSource};
use crate::cache::{CacheLookup, TemplateCache};
use crate::error::{MemeplateError, Result};
use crate::imaging::{decode_rgba, PixelBuffer};

/// Prefix of the `image_url` given to templates built from an in-memory image.
pub const IN_MEMORY_SCHEME: &str = "memory://";

/// Horizontal text alignment within a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Center,
    Left,
    Right,
}

/// Text transform applied before layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    #[default]
    Upper,
    Lower,
    None,
}

impl FromStr for TextStyle {
    type Err = MemeplateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "upper" => Ok(Self::Upper),
            "lower" => Ok(Self::Lower),
            "none" => Ok(Self::None),
            other => Err(MemeplateError::invalid_config(format!(
                "unknown text style '{}' (expected upper, lower or none)",
                other
            ))),
        }
    }
}

/// Where and how one line of text is rendered on a template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextPosition {
    /// Left edge of the box.
    pub anchor_x: f64,
    /// Top edge of the box.
    pub anchor_y: f64,
    /// Box width as a fraction of image width.
    pub scale_x: f64,
    /// Box height as a fraction of image height.
    pub scale_y: f64,
    pub align: Align,
    pub style: TextStyle,
    /// Rotation in degrees.
    pub angle: f64,
}

/// Classic top/bottom layout.
pub const DEFAULT_TEXT_POSITIONS: [TextPosition; 2] = [
    TextPosition::band(0.0, 0.0, 1.0, 0.2),
    TextPosition::band(0.0, 0.8, 1.0, 0.2),
];

impl TextPosition {
    const fn band(anchor_x: f64, anchor_y: f64, scale_x: f64, scale_y: f64) -> Self {
        Self {
            anchor_x,
            anchor_y,
            scale_x,
            scale_y,
            align: Align::Center,
            style: TextStyle::Upper,
            angle: 0.0,
        }
    }

    /// Create a centered, upper-cased slot.
    ///
    /// Fails unless both scales are finite and positive. Anchors are not
    /// bounded, and `anchor + scale` may exceed 1.
    pub fn new(anchor_x: f64, anchor_y: f64, scale_x: f64, scale_y: f64) -> Result<Self> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(scale_x) || !positive(scale_y) {
            return Err(MemeplateError::invalid_config(format!(
                "text box scale must be positive, got {}x{}",
                scale_x, scale_y
            )));
        }
        if !anchor_x.is_finite() || !anchor_y.is_finite() {
            return Err(MemeplateError::invalid_config("text box anchor must be finite"));
        }
        Ok(Self::band(anchor_x, anchor_y, scale_x, scale_y))
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Centre of the box in image fractions, top-left origin.
    pub fn center(&self) -> (f64, f64) {
        (
            self.anchor_x + self.scale_x / 2.0,
            self.anchor_y + self.scale_y / 2.0,
        )
    }
}

/// Slot layout for `lines` text lines.
///
/// Up to two lines take the leading default positions; more lines are split
/// into equal full-width bands from top to bottom.
pub fn layout_positions(lines: usize) -> Result<Vec<TextPosition>> {
    match lines {
        0 => Err(MemeplateError::invalid_config("lines must be >= 1")),
        1 | 2 => Ok(DEFAULT_TEXT_POSITIONS[..lines].to_vec()),
        n => {
            let height = 1.0 / n as f64;
            Ok((0..n)
                .map(|i| TextPosition::band(0.0, i as f64 * height, 1.0, height))
                .collect())
        }
    }
}

/// Set-once holder for a template's decoded image.
///
/// Concurrent fills are allowed; the first one wins and later ones get the
/// winner back.
#[derive(Clone, Default)]
pub struct ImageSlot(OnceLock<PixelBuffer>);

impl ImageSlot {
    pub fn get(&self) -> Option<PixelBuffer> {
        self.0.get().cloned()
    }

    pub fn is_set(&self) -> bool {
        self.0.get().is_some()
    }

    /// Store `image` unless the slot is already filled; returns the stored image.
    pub fn fill(&self, image: PixelBuffer) -> PixelBuffer {
        match self.0.set(image.clone()) {
            Ok(()) => image,
            Err(_) => self.get().unwrap_or(image),
        }
    }
}

impl fmt::Debug for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.get() {
            Some(image) => write!(f, "ImageSlot({}x{})", image.width(), image.height()),
            None => f.write_str("ImageSlot(empty)"),
        }
    }
}

/// A background image with text slots.
#[derive(Debug, Clone, Serialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    /// Remote URL, local path, or an [`IN_MEMORY_SCHEME`] sentinel.
    pub image_url: String,
    pub text_positions: Vec<TextPosition>,
    pub keywords: Vec<String>,
    pub example: Vec<String>,
    #[serde(skip)]
    image: ImageSlot,
}

impl Template {
    /// Create a template with the default two-slot layout.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(MemeplateError::invalid_config("template id must not be empty"));
        }
        Ok(Self {
            id,
            name: name.into(),
            image_url: image_url.into(),
            text_positions: DEFAULT_TEXT_POSITIONS.to_vec(),
            keywords: Vec::new(),
            example: Vec::new(),
            image: ImageSlot::default(),
        })
    }

    /// Replace the text slots. At least one slot is required.
    pub fn with_text_positions(mut self, positions: Vec<TextPosition>) -> Result<Self> {
        if positions.is_empty() {
            return Err(MemeplateError::invalid_config(
                "a template needs at least one text position",
            ));
        }
        self.text_positions = positions;
        Ok(self)
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_example(mut self, example: Vec<String>) -> Self {
        self.example = example;
        self
    }

    /// Template for a local image file or an HTTP(S) URL.
    ///
    /// The ID is the file stem (or last URL segment's stem); the name
    /// defaults to the ID. Local paths are made absolute, with `~` expanded.
    /// The image itself is not read until [`get_image`](Self::get_image).
    pub fn from_image(path_or_url: &str, lines: usize, name: Option<&str>) -> Result<Self> {
        let positions = layout_positions(lines)?;

        let (id, image_url) = if is_remote_url(path_or_url) {
            (url_stem(path_or_url), path_or_url.to_string())
        } else {
            let path = absolute_path(&expand_home(path_or_url))?;
            let id = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "template".to_string());
            (id, path.to_string_lossy().into_owned())
        };

        let name = name
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| id.clone());
        Template::new(id, name, image_url)?.with_text_positions(positions)
    }

    /// Template described by a catalog entry.
    ///
    /// The blank image URL defaults to `{api_base}/images/{id}.png`.
    pub fn from_catalog_entry(entry: &CatalogEntry, api_base: &str) -> Result<Self> {
        let image_url = entry.blank.clone().unwrap_or_else(|| {
            format!("{}/images/{}.png", api_base.trim_end_matches('/'), entry.id)
        });

        Ok(Template::new(&entry.id, entry.display_name(), image_url)?
            .with_text_positions(layout_positions(entry.line_count())?)?
            .with_keywords(entry.keywords.clone())
            .with_example(entry.example_lines().to_vec()))
    }

    /// Template around an image already in memory.
    pub fn from_pixels(id: impl Into<String>, image: PixelBuffer) -> Result<Self> {
        let id = id.into();
        let template = Template::new(id.clone(), id.clone(), format!("{}{}", IN_MEMORY_SCHEME, id))?;
        template.image.fill(image);
        Ok(template)
    }

    /// Whether the image has already been loaded into this template.
    pub fn has_image(&self) -> bool {
        self.image.is_set()
    }

    /// Return the background image, loading it on first use.
    ///
    /// Order: this template's own slot, then `cache`, then `source`. Bytes
    /// fetched from `source` are decoded and written through to `cache`.
    pub fn get_image(
        &self,
        cache: Option<&TemplateCache>,
        source: &dyn ImageSource,
    ) -> Result<PixelBuffer> {
        if let Some(image) = self.image.get() {
            return Ok(image);
        }

        if let Some(cache) = cache {
            if let CacheLookup::Hit(image) = cache.get_image(&self.image_url) {
                return Ok(self.image.fill(image));
            }
        }

        let bytes = source
            .fetch_bytes(&self.image_url)
            .map_err(|e| self.fetch_error(e))?;
        let image = decode_rgba(&bytes).map_err(|e| MemeplateError::Decode {
            location: self.image_url.clone(),
            message: e.to_string(),
        })?;

        if let Some(cache) = cache {
            if let Err(e) = cache.put_decoded(&self.image_url, &bytes, image.clone()) {
                tracing::warn!("Failed to cache image {}: {}", self.image_url, e);
            }
        }

        Ok(self.image.fill(image))
    }

    fn fetch_error(&self, err: FetchError) -> MemeplateError {
        match err {
            FetchError::NotFound { location } if is_remote_url(&location) => {
                MemeplateError::ImageNotFound { location }
            }
            FetchError::NotFound { location } => MemeplateError::FileNotFound {
                path: PathBuf::from(location),
            },
            FetchError::Transport { location, message } => {
                MemeplateError::Transport { location, message }
            }
        }
    }
}

/// Expand a leading `~` to the home directory.
pub(crate) fn expand_home(path: &str) -> PathBuf {
    let rest = path
        .strip_prefix("~/")
        .or_else(|| path.strip_prefix("~\\"))
        .or_else(|| (path == "~").then_some(""));
    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

fn absolute_path(path: &Path) -> Result<PathBuf> {
    match path.canonicalize() {
        Ok(p) => Ok(p),
        Err(_) => Ok(std::path::absolute(path)?),
    }
}

/// Stem of the last path segment of a URL, ignoring query and fragment.
fn url_stem(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let segment = without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("");
    Path::new(segment)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "template".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{solid_png, StaticImages};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn default_positions_are_top_and_bottom() {
        let [top, bottom] = DEFAULT_TEXT_POSITIONS;
        assert_eq!((top.anchor_y, top.scale_y), (0.0, 0.2));
        assert_eq!((bottom.anchor_y, bottom.scale_y), (0.8, 0.2));
        assert_eq!(top.align, Align::Center);
        assert_eq!(top.style, TextStyle::Upper);
    }

    #[test]
    fn layout_four_lines_stacks_equal_bands() {
        let positions = layout_positions(4).unwrap();
        let anchors: Vec<f64> = positions.iter().map(|p| p.anchor_y).collect();
        assert_eq!(anchors, vec![0.0, 0.25, 0.5, 0.75]);
        assert!(positions.iter().all(|p| p.scale_y == 0.25));
        assert!(positions.iter().all(|p| p.anchor_x == 0.0 && p.scale_x == 1.0));
    }

    #[test]
    fn layout_bands_cover_full_height_without_gaps() {
        for n in 3..=12 {
            let positions = layout_positions(n).unwrap();
            assert_eq!(positions.len(), n);
            for pair in positions.windows(2) {
                let end = pair[0].anchor_y + pair[0].scale_y;
                assert!((end - pair[1].anchor_y).abs() < 1e-12);
            }
            let last = positions[n - 1];
            assert!((last.anchor_y + last.scale_y - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn layout_two_or_fewer_uses_defaults() {
        assert_eq!(layout_positions(1).unwrap(), DEFAULT_TEXT_POSITIONS[..1].to_vec());
        assert_eq!(layout_positions(2).unwrap(), DEFAULT_TEXT_POSITIONS.to_vec());
    }

    #[test]
    fn layout_zero_lines_is_config_error() {
        assert!(matches!(
            layout_positions(0),
            Err(MemeplateError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn text_position_rejects_non_positive_scale() {
        assert!(TextPosition::new(0.0, 0.0, 0.0, 0.2).is_err());
        assert!(TextPosition::new(0.0, 0.0, 1.0, -0.1).is_err());
        assert!(TextPosition::new(0.0, 0.0, f64::NAN, 0.2).is_err());
        // Overflowing the image is allowed
        assert!(TextPosition::new(0.5, 0.9, 1.0, 0.5).is_ok());
    }

    #[test]
    fn text_position_center() {
        let pos = TextPosition::new(0.0, 0.8, 1.0, 0.2).unwrap();
        let (x, y) = pos.center();
        assert!((x - 0.5).abs() < 1e-12);
        assert!((y - 0.9).abs() < 1e-12);
    }

    #[test]
    fn text_style_parses() {
        assert_eq!("UPPER".parse::<TextStyle>().unwrap(), TextStyle::Upper);
        assert_eq!("none".parse::<TextStyle>().unwrap(), TextStyle::None);
        assert!("shouty".parse::<TextStyle>().is_err());
    }

    #[test]
    fn empty_id_is_rejected() {
        assert!(Template::new("", "x", "x.png").is_err());
    }

    #[test]
    fn empty_positions_are_rejected() {
        let template = Template::new("a", "a", "a.png").unwrap();
        assert!(template.with_text_positions(vec![]).is_err());
    }

    #[test]
    fn from_image_url_uses_last_segment() {
        let template = Template::from_image("https://example.com/template.png", 2, None).unwrap();
        assert_eq!(template.id, "template");
        assert_eq!(template.name, "template");
        assert_eq!(template.image_url, "https://example.com/template.png");

        let template = Template::from_image("https://example.com/templates/buzz", 2, None).unwrap();
        assert_eq!(template.id, "buzz");

        let template =
            Template::from_image("https://example.com/img/cat.jpg?size=large", 1, None).unwrap();
        assert_eq!(template.id, "cat");
        assert_eq!(template.text_positions.len(), 1);
    }

    #[test]
    fn from_image_local_path_is_absolute() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("photo.jpg");
        fs::write(&path, b"x").unwrap();

        let template =
            Template::from_image(path.to_str().unwrap(), 3, Some("My Photo")).unwrap();
        assert_eq!(template.id, "photo");
        assert_eq!(template.name, "My Photo");
        assert!(Path::new(&template.image_url).is_absolute());
        assert_eq!(template.text_positions.len(), 3);
    }

    #[test]
    fn from_image_zero_lines_is_config_error() {
        assert!(matches!(
            Template::from_image("https://example.com/a.png", 0, None),
            Err(MemeplateError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn from_catalog_entry_populates_fields() {
        let entry = CatalogEntry::new("buzz", "Buzz Lightyear")
            .with_blank("https://api.memegen.link/images/buzz.png")
            .with_keywords(["toy story"])
            .with_example(["memes", "memes everywhere"]);

        let template = Template::from_catalog_entry(&entry, "https://api.memegen.link").unwrap();
        assert_eq!(template.id, "buzz");
        assert_eq!(template.name, "Buzz Lightyear");
        assert_eq!(template.image_url, "https://api.memegen.link/images/buzz.png");
        assert_eq!(template.keywords, vec!["toy story"]);
        assert_eq!(template.example, vec!["memes", "memes everywhere"]);
        assert_eq!(template.text_positions, DEFAULT_TEXT_POSITIONS.to_vec());
    }

    #[test]
    fn from_catalog_entry_defaults_blank_url_and_layout() {
        let entry = CatalogEntry::new("gru", "Gru's Plan").with_lines(4);
        let template = Template::from_catalog_entry(&entry, "https://api.example.com/").unwrap();

        assert_eq!(template.image_url, "https://api.example.com/images/gru.png");
        assert_eq!(template.text_positions.len(), 4);
        assert_eq!(template.text_positions[2].anchor_y, 0.5);
    }

    #[test]
    fn from_pixels_is_preloaded() {
        let image = crate::imaging::decode_rgba(&solid_png(2, 2, [1, 1, 1, 255])).unwrap();
        let template = Template::from_pixels("chart", image).unwrap();

        assert!(template.has_image());
        assert!(template.image_url.starts_with(IN_MEMORY_SCHEME));
        let source = StaticImages::default();
        assert_eq!(template.get_image(None, &source).unwrap().width(), 2);
        assert_eq!(source.calls(), 0);
    }

    #[test]
    fn get_image_fetches_once_then_uses_slot() {
        let source = StaticImages::default().with("https://x/a.png", solid_png(3, 2, [4, 5, 6, 255]));
        let template = Template::from_image("https://x/a.png", 2, None).unwrap();

        let first = template.get_image(None, &source).unwrap();
        let second = template.get_image(None, &source).unwrap();

        assert_eq!(first.dimensions(), (3, 2));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn get_image_writes_through_to_cache() {
        let temp = TempDir::new().unwrap();
        let cache = TemplateCache::new(temp.path(), 5).unwrap();
        let source = StaticImages::default().with("https://x/a.png", solid_png(2, 2, [1, 2, 3, 255]));

        let template = Template::from_image("https://x/a.png", 2, None).unwrap();
        template.get_image(Some(&cache), &source).unwrap();
        assert!(cache.get_image("https://x/a.png").is_hit());

        // A second template for the same URL is served from the cache
        let again = Template::from_image("https://x/a.png", 2, None).unwrap();
        again.get_image(Some(&cache), &source).unwrap();
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn get_image_missing_local_file_is_file_not_found() {
        let template = Template::new("gone", "gone", "/no/such/dir/gone.png").unwrap();
        let err = template
            .get_image(None, &StaticImages::default())
            .unwrap_err();
        assert!(matches!(err, MemeplateError::FileNotFound { .. }));
    }

    #[test]
    fn get_image_missing_remote_is_image_not_found() {
        let template = Template::from_image("https://x/gone.png", 2, None).unwrap();
        let err = template
            .get_image(None, &StaticImages::default())
            .unwrap_err();
        assert!(matches!(err, MemeplateError::ImageNotFound { .. }));
    }

    #[test]
    fn get_image_undecodable_source_is_decode_error() {
        let temp = TempDir::new().unwrap();
        let cache = TemplateCache::new(temp.path(), 5).unwrap();
        let source = StaticImages::default().with("https://x/a.png", b"<html>".to_vec());
        let template = Template::from_image("https://x/a.png", 2, None).unwrap();

        let err = template.get_image(Some(&cache), &source).unwrap_err();
        assert!(matches!(err, MemeplateError::Decode { .. }));
        assert!(!template.has_image());
        assert!(!cache.get_image("https://x/a.png").is_hit());
    }

    #[test]
    fn slot_fill_keeps_first_value() {
        let slot = ImageSlot::default();
        let a = crate::imaging::decode_rgba(&solid_png(1, 1, [1, 0, 0, 255])).unwrap();
        let b = crate::imaging::decode_rgba(&solid_png(1, 1, [2, 0, 0, 255])).unwrap();

        assert!(Arc::ptr_eq(&slot.fill(a.clone()), &a));
        assert!(Arc::ptr_eq(&slot.fill(b), &a));
        assert_eq!(format!("{:?}", slot), "ImageSlot(1x1)");
    }

    #[test]
    fn expand_home_handles_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/memes/a.png"), home.join("memes/a.png"));
        }
        assert_eq!(expand_home("memes/a.png"), PathBuf::from("memes/a.png"));
    }
}
