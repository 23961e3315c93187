//! Layout command implementation.
//!
//! `memeplate layout <REF> <LINES>...` resolves a template, loads its image
//! through the cache, and prints where and how large each line would be
//! drawn. Image pixels are treated as points.

use crate::cli::args::LayoutArgs;
use crate::error::Result;
use crate::meme::Meme;
use crate::registry::TemplateResolver;
use crate::text::{ApproxMetrics, FitParams, TextLayoutEngine};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The layout command implementation.
pub struct LayoutCommand<'a> {
    resolver: &'a TemplateResolver,
    params: FitParams,
    args: LayoutArgs,
}

impl<'a> LayoutCommand<'a> {
    pub fn new(resolver: &'a TemplateResolver, params: FitParams, args: LayoutArgs) -> Self {
        Self {
            resolver,
            params,
            args,
        }
    }

    fn meme(&self) -> Meme {
        let mut meme = Meme::with_lines(self.args.lines.iter().cloned());
        if let Some(style) = self.args.style {
            meme = meme.style(style);
        }
        if let Some(size) = self.args.font_size {
            meme = meme.font_size(size);
        }
        meme
    }
}

impl Command for LayoutCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let engine = TextLayoutEngine::new(self.params)?;
        let template = self.resolver.resolve(&self.args.reference)?;
        let image = self.resolver.load_image(&template)?;
        let metrics = ApproxMetrics::new(image.width() as f64, image.height() as f64)?;

        let slots = template.text_positions.len();
        if self.args.lines.len() > slots {
            ui.warning(&format!(
                "{} has {} text slots; ignoring {} extra line(s)",
                template.id,
                slots,
                self.args.lines.len() - slots
            ));
        }

        let placements = self.meme().layout_template(&template, &engine, &metrics);

        if self.args.json {
            let output = serde_json::to_string_pretty(&placements).map_err(anyhow::Error::from)?;
            ui.message(&output);
            return Ok(CommandResult::success());
        }

        ui.show_header(&format!(
            "{} ({}x{})",
            template.name,
            image.width(),
            image.height()
        ));
        for placement in &placements {
            let overflow = if placement.fits { "" } else { " [overflows]" };
            ui.message(&format!(
                "  [{}] {:.1}pt at ({:.2}, {:.2}){}: {}",
                placement.slot,
                placement.font_size,
                placement.center_x,
                placement.center_y,
                overflow,
                placement.text.replace('\n', " / ")
            ));
        }

        Ok(CommandResult::success())
    }
}
