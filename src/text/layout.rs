//! Shrink-to-fit text layout.
//!
//! Sizing runs in two phases. [`auto_font_size`] guesses a starting size
//! from the shape of the text and the box. [`TextLayoutEngine`] then
//! measures the text with a [`Measure`] backend and scales the size down
//! until it fits within tolerance, stopping at a floor size.

use serde::{Deserialize, Serialize};

use super::wrap::{smart_wrap_with, CHARS_PER_FULL_WIDTH, MIN_CHARS_PER_LINE};
use crate::error::{MemeplateError, Result};

/// Rendered size of a block of text, in fractions of the image size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl From<(f64, f64)> for Extent {
    fn from((width, height): (f64, f64)) -> Self {
        Self { width, height }
    }
}

/// A text measurement backend.
pub trait Measure {
    /// Extent of `text` (which may contain newlines) at `font_size` points.
    fn measure(&self, text: &str, font_size: f64) -> Extent;
}

impl<F> Measure for F
where
    F: Fn(&str, f64) -> (f64, f64),
{
    fn measure(&self, text: &str, font_size: f64) -> Extent {
        self(text, font_size).into()
    }
}

/// Tunable parameters of the fit algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitParams {
    /// Starting size before shape adjustments.
    pub base_size: f64,
    /// Smallest size the engine will shrink to.
    pub floor_size: f64,
    /// Upper bound on measurements per fit.
    pub max_iterations: u32,
    /// Overflow allowed in either dimension before shrinking.
    pub tolerance: f64,
    /// Extra shrink applied to each proportional step.
    pub damping: f64,
    /// Wrap width, in characters, of a full-width box.
    pub chars_per_full_width: f64,
    /// Narrowest wrap width.
    pub min_chars_per_line: usize,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            base_size: 36.0,
            floor_size: 8.0,
            max_iterations: 20,
            tolerance: 1.1,
            damping: 0.95,
            chars_per_full_width: CHARS_PER_FULL_WIDTH,
            min_chars_per_line: MIN_CHARS_PER_LINE,
        }
    }
}

impl FitParams {
    /// Check that the parameters describe a terminating, shrinking search.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let mut problems = Vec::new();

        if !positive(self.base_size) {
            problems.push(format!("base_size must be positive, got {}", self.base_size));
        }
        if !positive(self.floor_size) {
            problems.push(format!("floor_size must be positive, got {}", self.floor_size));
        }
        if self.max_iterations == 0 {
            problems.push("max_iterations must be at least 1".to_string());
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 1.0) {
            problems.push(format!("tolerance must be >= 1.0, got {}", self.tolerance));
        }
        if !(positive(self.damping) && self.damping <= 1.0) {
            problems.push(format!("damping must be in (0, 1], got {}", self.damping));
        }
        if !positive(self.chars_per_full_width) {
            problems.push(format!(
                "chars_per_full_width must be positive, got {}",
                self.chars_per_full_width
            ));
        }
        if self.min_chars_per_line == 0 {
            problems.push("min_chars_per_line must be at least 1".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(MemeplateError::invalid_config(format!(
                "invalid fit parameters: {}",
                problems.join("; ")
            )))
        }
    }
}

/// Outcome of fitting text into a box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitResult {
    /// The wrapped text that was measured.
    pub text: String,
    pub font_size: f64,
    /// Measurements taken.
    pub iterations: u32,
    /// Whether the last measurement was within tolerance. Text that is still
    /// too large at the floor size overflows.
    pub fits: bool,
}

/// Estimate a starting font size for `text` in a `box_width` x `box_height`
/// box.
///
/// Long lines, many lines and small boxes each scale the base size down.
pub fn auto_font_size(text: &str, box_width: f64, box_height: f64, base_size: f64) -> f64 {
    let line_count = text.split('\n').count().max(1);
    let longest = text
        .split('\n')
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);

    let length_factor = (1.0 - longest as f64 / 60.0).max(0.3);
    let lines_factor = (1.0 / (line_count as f64).sqrt()).max(0.4);
    let area_factor = (box_width * box_height).max(0.0).powf(0.25);

    base_size * length_factor * lines_factor * area_factor
}

/// Fits text into boxes by measured proportional shrinking.
#[derive(Debug, Clone, Default)]
pub struct TextLayoutEngine {
    params: FitParams,
}

impl TextLayoutEngine {
    /// Create an engine, rejecting invalid parameters.
    pub fn new(params: FitParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &FitParams {
        &self.params
    }

    /// Wrap `text` the way [`fit`](Self::fit) does for a box this wide.
    pub fn wrap(&self, text: &str, box_width: f64) -> String {
        smart_wrap_with(
            text,
            box_width,
            self.params.chars_per_full_width,
            self.params.min_chars_per_line,
        )
    }

    /// Wrap, estimate and shrink `text` to fit the box.
    ///
    /// A box with a side that is not finite and positive never fits; the
    /// result is reported at the floor size without measuring.
    pub fn fit(
        &self,
        text: &str,
        box_width: f64,
        box_height: f64,
        measure: &dyn Measure,
    ) -> FitResult {
        let wrapped = self.wrap(text, box_width);
        let initial = auto_font_size(&wrapped, box_width, box_height, self.params.base_size);
        self.shrink(wrapped, box_width, box_height, initial, measure)
    }

    /// Wrap `text` and shrink from a caller-chosen starting size.
    pub fn fit_from_size(
        &self,
        text: &str,
        box_width: f64,
        box_height: f64,
        initial_size: f64,
        measure: &dyn Measure,
    ) -> FitResult {
        let wrapped = self.wrap(text, box_width);
        self.shrink(wrapped, box_width, box_height, initial_size, measure)
    }

    fn shrink(
        &self,
        text: String,
        box_width: f64,
        box_height: f64,
        initial_size: f64,
        measure: &dyn Measure,
    ) -> FitResult {
        let FitParams {
            floor_size,
            max_iterations,
            tolerance,
            damping,
            ..
        } = self.params;

        if !(box_width.is_finite() && box_width > 0.0 && box_height.is_finite() && box_height > 0.0)
        {
            tracing::debug!("Degenerate box {}x{}, using floor size", box_width, box_height);
            return FitResult {
                text,
                font_size: floor_size,
                iterations: 0,
                fits: false,
            };
        }

        let mut size = initial_size;
        let mut iterations = 0;
        let mut fits = false;

        while iterations < max_iterations {
            let extent = measure.measure(&text, size);
            iterations += 1;

            if extent.width <= box_width * tolerance && extent.height <= box_height * tolerance {
                fits = true;
                break;
            }
            if size <= floor_size {
                break;
            }

            let scale = (box_width / extent.width.max(0.01))
                .min(box_height / extent.height.max(0.01));
            size = (size * scale * damping).max(floor_size);
            tracing::trace!("Fit iteration {}: {:.2}pt", iterations, size);
        }

        if !fits {
            tracing::debug!(
                "Text does not fit after {} measurements, using {:.1}pt",
                iterations,
                size
            );
        }

        FitResult {
            text,
            font_size: size,
            iterations,
            fits,
        }
    }
}

/// Measurement by fixed glyph advance on a canvas of known point size.
///
/// No font is consulted: every character advances 0.6 em and lines are
/// spaced 1.1 em apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproxMetrics {
    canvas_width: f64,
    canvas_height: f64,
    pub advance: f64,
    pub line_spacing: f64,
}

impl ApproxMetrics {
    /// Metrics for a canvas `width` x `height` points.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(MemeplateError::invalid_config(format!(
                "canvas size must be positive, got {}x{}",
                width, height
            )));
        }
        Ok(Self {
            canvas_width: width,
            canvas_height: height,
            advance: 0.6,
            line_spacing: 1.1,
        })
    }
}

impl Measure for ApproxMetrics {
    fn measure(&self, text: &str, font_size: f64) -> Extent {
        let lines = text.split('\n').count().max(1) as f64;
        let longest = text
            .split('\n')
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0) as f64;

        Extent {
            width: longest * font_size * self.advance / self.canvas_width,
            height: lines * font_size * self.line_spacing / self.canvas_height,
        }
    }
}
