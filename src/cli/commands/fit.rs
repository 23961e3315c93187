//! Fit command implementation.
//!
//! `memeplate fit <TEXT>` runs the shrink-to-fit engine against a box on a
//! canvas, measuring with fixed-advance metrics.

use crate::cli::args::FitArgs;
use crate::error::Result;
use crate::text::{ApproxMetrics, FitParams, TextLayoutEngine};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The fit command implementation.
pub struct FitCommand {
    params: FitParams,
    args: FitArgs,
}

impl FitCommand {
    pub fn new(params: FitParams, args: FitArgs) -> Self {
        Self { params, args }
    }
}

impl Command for FitCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let engine = TextLayoutEngine::new(self.params)?;
        let (canvas_w, canvas_h) = self.args.canvas;
        let metrics = ApproxMetrics::new(canvas_w, canvas_h)?;

        let result = engine.fit(&self.args.text, self.args.width, self.args.height, &metrics);

        if self.args.json {
            let output = serde_json::to_string_pretty(&result).map_err(anyhow::Error::from)?;
            ui.message(&output);
            return Ok(CommandResult::success());
        }

        ui.field("font size", &format!("{:.1}pt", result.font_size));
        ui.field("lines", &result.text.lines().count().to_string());
        ui.field("iterations", &result.iterations.to_string());
        ui.field("fits", if result.fits { "yes" } else { "no (overflows)" });
        ui.message(&result.text);

        Ok(CommandResult::success())
    }
}
