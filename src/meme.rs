//! Meme composition.
//!
//! A [`Meme`] collects text lines and styling options, then lays them out
//! against a template's slots (or a [`LayoutPreset`] for arbitrary
//! canvases), producing one [`Placement`] per drawn line.
//!
//! ```
//! use memeplate::meme::{LayoutPreset, Meme};
//! use memeplate::text::{ApproxMetrics, TextLayoutEngine};
//!
//! let metrics = ApproxMetrics::new(800.0, 600.0).unwrap();
//! let placements = Meme::new()
//!     .top("one does not simply")
//!     .bottom("write a meme engine")
//!     .layout(&LayoutPreset::TopBottom.positions(), &TextLayoutEngine::default(), &metrics);
//!
//! assert_eq!(placements.len(), 2);
//! assert_eq!(placements[0].text, "ONE DOES NOT SIMPLY");
//! ```

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{MemeplateError, Result};
use crate::registry::{Align, Template, TextPosition, TextStyle, DEFAULT_TEXT_POSITIONS};
use crate::text::{apply_style, Measure, TextLayoutEngine};

/// Slot arrangements for overlaying text on a canvas with no template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutPreset {
    #[default]
    TopBottom,
    Top,
    Bottom,
    Center,
}

const CENTER_BAND: TextPosition = TextPosition {
    anchor_x: 0.0,
    anchor_y: 0.4,
    scale_x: 1.0,
    scale_y: 0.2,
    align: Align::Center,
    style: TextStyle::Upper,
    angle: 0.0,
};

impl LayoutPreset {
    pub fn positions(self) -> Vec<TextPosition> {
        let [top, bottom] = DEFAULT_TEXT_POSITIONS;
        match self {
            LayoutPreset::TopBottom => vec![top, bottom],
            LayoutPreset::Top => vec![top],
            LayoutPreset::Bottom => vec![bottom],
            LayoutPreset::Center => vec![CENTER_BAND],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutPreset::TopBottom => "top-bottom",
            LayoutPreset::Top => "top",
            LayoutPreset::Bottom => "bottom",
            LayoutPreset::Center => "center",
        }
    }
}

impl FromStr for LayoutPreset {
    type Err = MemeplateError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "top-bottom" => Ok(Self::TopBottom),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "center" => Ok(Self::Center),
            other => Err(MemeplateError::invalid_config(format!(
                "unknown layout preset '{}' (expected top-bottom, top, bottom or center)",
                other
            ))),
        }
    }
}

impl fmt::Display for LayoutPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of text, sized and positioned for drawing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    /// Index of the slot this line fills.
    pub slot: usize,
    /// Styled and wrapped text.
    pub text: String,
    pub font_size: f64,
    /// Slot centre, as fractions of the image with `(0, 0)` at top-left.
    pub center_x: f64,
    pub center_y: f64,
    pub align: Align,
    pub angle: f64,
    /// Whether the text fits its slot at `font_size`.
    pub fits: bool,
}

/// Text lines plus styling for one meme.
#[derive(Debug, Clone, Default)]
pub struct Meme {
    lines: Vec<String>,
    style: Option<TextStyle>,
    font_size: Option<f64>,
}

impl Meme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a list of lines, one per slot.
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the first line.
    pub fn top(self, text: impl Into<String>) -> Self {
        self.text(0, text)
    }

    /// Set the second line.
    pub fn bottom(self, text: impl Into<String>) -> Self {
        self.text(1, text)
    }

    /// Set the line at `index`, padding skipped lines with empty text.
    pub fn text(mut self, index: usize, text: impl Into<String>) -> Self {
        if self.lines.len() <= index {
            self.lines.resize(index + 1, String::new());
        }
        self.lines[index] = text.into();
        self
    }

    /// Override every slot's own text style.
    pub fn style(mut self, style: TextStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Start fitting from this size instead of the estimate.
    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lay the lines out in `positions`.
    ///
    /// Empty lines and lines beyond the last slot are skipped.
    pub fn layout(
        &self,
        positions: &[TextPosition],
        engine: &TextLayoutEngine,
        measure: &dyn Measure,
    ) -> Vec<Placement> {
        self.lines
            .iter()
            .zip(positions)
            .enumerate()
            .filter(|(_, (line, _))| !line.is_empty())
            .map(|(slot, (line, pos))| {
                let styled = apply_style(line, self.style.unwrap_or(pos.style));
                let fit = match self.font_size {
                    Some(size) => {
                        engine.fit_from_size(&styled, pos.scale_x, pos.scale_y, size, measure)
                    }
                    None => engine.fit(&styled, pos.scale_x, pos.scale_y, measure),
                };
                let (center_x, center_y) = pos.center();
                Placement {
                    slot,
                    text: fit.text,
                    font_size: fit.font_size,
                    center_x,
                    center_y,
                    align: pos.align,
                    angle: pos.angle,
                    fits: fit.fits,
                }
            })
            .collect()
    }

    /// Lay the lines out in a template's slots.
    pub fn layout_template(
        &self,
        template: &Template,
        engine: &TextLayoutEngine,
        measure: &dyn Measure,
    ) -> Vec<Placement> {
        self.layout(&template.text_positions, engine, measure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::layout_positions;
    use crate::text::ApproxMetrics;

    fn metrics() -> ApproxMetrics {
        ApproxMetrics::new(600.0, 600.0).unwrap()
    }

    #[test]
    fn presets_parse_and_display() {
        for name in ["top-bottom", "top", "bottom", "center"] {
            let preset: LayoutPreset = name.parse().unwrap();
            assert_eq!(preset.to_string(), name);
        }
        assert!("middle".parse::<LayoutPreset>().is_err());
    }

    #[test]
    fn preset_positions() {
        assert_eq!(LayoutPreset::TopBottom.positions().len(), 2);
        assert_eq!(LayoutPreset::Bottom.positions()[0].anchor_y, 0.8);
        let center = LayoutPreset::Center.positions()[0];
        assert_eq!((center.anchor_y, center.scale_y), (0.4, 0.2));
    }

    #[test]
    fn builder_pads_lines() {
        let meme = Meme::new().bottom("bottom only");
        assert_eq!(meme.lines(), ["", "bottom only"]);

        let meme = Meme::new().text(3, "fourth").top("first");
        assert_eq!(meme.lines(), ["first", "", "", "fourth"]);
    }

    #[test]
    fn skips_empty_and_extra_lines() {
        let meme = Meme::with_lines(["", "second", "third"]);
        let placements = meme.layout(
            &DEFAULT_TEXT_POSITIONS,
            &TextLayoutEngine::default(),
            &metrics(),
        );

        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].slot, 1);
        assert_eq!(placements[0].text, "SECOND");
    }

    #[test]
    fn centres_are_top_origin() {
        let placements = Meme::new().top("a").bottom("b").layout(
            &DEFAULT_TEXT_POSITIONS,
            &TextLayoutEngine::default(),
            &metrics(),
        );

        assert!((placements[0].center_y - 0.1).abs() < 1e-12);
        assert!((placements[1].center_y - 0.9).abs() < 1e-12);
        assert!(placements.iter().all(|p| (p.center_x - 0.5).abs() < 1e-12));
    }

    #[test]
    fn style_override_beats_slot_style() {
        let positions = vec![DEFAULT_TEXT_POSITIONS[0].with_style(TextStyle::Lower)];
        let engine = TextLayoutEngine::default();

        let slot_styled = Meme::new().top("MiXeD").layout(&positions, &engine, &metrics());
        assert_eq!(slot_styled[0].text, "mixed");

        let overridden = Meme::new()
            .top("MiXeD")
            .style(TextStyle::None)
            .layout(&positions, &engine, &metrics());
        assert_eq!(overridden[0].text, "MiXeD");
    }

    #[test]
    fn fixed_font_size_still_shrinks() {
        let engine = TextLayoutEngine::default();
        let small = Meme::new()
            .top("hi")
            .font_size(12.0)
            .layout(&DEFAULT_TEXT_POSITIONS, &engine, &metrics());
        assert_eq!(small[0].font_size, 12.0);

        let huge = Meme::new()
            .top("this will not fit at two hundred points")
            .font_size(200.0)
            .layout(&DEFAULT_TEXT_POSITIONS, &engine, &metrics());
        assert!(huge[0].font_size < 200.0);
    }

    #[test]
    fn layout_template_uses_its_slots() {
        let template = Template::new("t", "t", "t.png")
            .unwrap()
            .with_text_positions(layout_positions(4).unwrap())
            .unwrap();
        let placements = Meme::with_lines(["a", "b", "c", "d"]).layout_template(
            &template,
            &TextLayoutEngine::default(),
            &metrics(),
        );

        assert_eq!(placements.len(), 4);
        assert!((placements[3].center_y - 0.875).abs() < 1e-12);
    }
}
