//! Resolve command implementation.
//!
//! `memeplate resolve <REF>` shows what a reference resolves to without
//! downloading the image.

use crate::cli::args::ResolveArgs;
use crate::error::{MemeplateError, Result};
use crate::registry::{Template, TemplateResolver, TextPosition};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The resolve command implementation.
pub struct ResolveCommand<'a> {
    resolver: &'a TemplateResolver,
    args: ResolveArgs,
}

impl<'a> ResolveCommand<'a> {
    pub fn new(resolver: &'a TemplateResolver, args: ResolveArgs) -> Self {
        Self { resolver, args }
    }
}

impl Command for ResolveCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let template = match self
            .resolver
            .resolve_with_lines(&self.args.reference, self.args.lines)
        {
            Ok(t) => t,
            Err(e @ (MemeplateError::TemplateNotFound { .. } | MemeplateError::FileNotFound { .. })) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(2));
            }
            Err(e) => return Err(e),
        };

        if self.args.json {
            let output = serde_json::to_string_pretty(&template).map_err(anyhow::Error::from)?;
            ui.message(&output);
        } else {
            show_template(&template, ui);
        }

        Ok(CommandResult::success())
    }
}

pub(super) fn describe_position(pos: &TextPosition) -> String {
    let mut description = format!(
        "({:.2}, {:.2}) {:.2}x{:.2} {:?}/{:?}",
        pos.anchor_x, pos.anchor_y, pos.scale_x, pos.scale_y, pos.align, pos.style
    )
    .to_lowercase();
    if pos.angle != 0.0 {
        description.push_str(&format!(" {}°", pos.angle));
    }
    description
}

fn show_template(template: &Template, ui: &mut dyn UserInterface) {
    ui.show_header(&template.name);
    ui.field("id", &template.id);
    ui.field("image", &template.image_url);
    if !template.keywords.is_empty() {
        ui.field("keywords", &template.keywords.join(", "));
    }
    if !template.example.is_empty() {
        ui.field("example", &template.example.join(" / "));
    }
    ui.field("slots", &template.text_positions.len().to_string());
    for (i, pos) in template.text_positions.iter().enumerate() {
        ui.message(&format!("  [{}] {}", i, describe_position(pos)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TemplateCache;
    use crate::registry::CatalogEntry;
    use crate::test_support::{StaticCatalog, StaticImages};
    use crate::ui::MockUI;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn resolver(temp: &TempDir) -> TemplateResolver {
        let cache = Arc::new(TemplateCache::new(temp.path(), 5).unwrap());
        TemplateResolver::new("https://api.example.com", cache)
            .with_catalog_source(StaticCatalog::new(vec![CatalogEntry::new("buzz", "Buzz")
                .with_keywords(["toy story"])]))
            .with_image_source(StaticImages::default())
    }

    fn args(reference: &str) -> ResolveArgs {
        ResolveArgs {
            reference: reference.to_string(),
            lines: None,
            json: false,
        }
    }

    #[test]
    fn shows_catalog_template() {
        let temp = TempDir::new().unwrap();
        let resolver = resolver(&temp);
        let mut ui = MockUI::new();

        let result = ResolveCommand::new(&resolver, args("buzz"))
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert_eq!(ui.headers(), ["Buzz"]);
        assert_eq!(
            ui.field_value("image"),
            Some("https://api.example.com/images/buzz.png")
        );
        assert_eq!(ui.field_value("slots"), Some("2"));
        assert!(ui.has_message("[1] (0.00, 0.80) 1.00x0.20 center/upper"));
    }

    #[test]
    fn unknown_template_exits_2() {
        let temp = TempDir::new().unwrap();
        let resolver = resolver(&temp);
        let mut ui = MockUI::new();

        let result = ResolveCommand::new(&resolver, args("nope"))
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, 2);
        assert!(ui.errors()[0].contains("nope"));
    }

    #[test]
    fn json_includes_positions() {
        let temp = TempDir::new().unwrap();
        let resolver = resolver(&temp);
        let mut ui = MockUI::new();
        let mut json_args = args("buzz");
        json_args.json = true;
        json_args.lines = Some(3);

        ResolveCommand::new(&resolver, json_args)
            .execute(&mut ui)
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&ui.output()).unwrap();
        assert_eq!(value["id"], "buzz");
        assert_eq!(value["text_positions"].as_array().unwrap().len(), 3);
        assert_eq!(value["text_positions"][0]["align"], "center");
    }
}
