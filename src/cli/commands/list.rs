//! List command implementation.
//!
//! The `memeplate list` command prints the whole template catalog.

use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::registry::{CatalogEntry, TemplateResolver};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand<'a> {
    resolver: &'a TemplateResolver,
    args: ListArgs,
}

impl<'a> ListCommand<'a> {
    pub fn new(resolver: &'a TemplateResolver, args: ListArgs) -> Self {
        Self { resolver, args }
    }
}

impl Command for ListCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let entries = self.resolver.list_all()?;
        show_entries(&entries, self.args.json, ui)?;
        Ok(CommandResult::success())
    }
}

/// Print catalog entries as an aligned table or a JSON array.
pub(super) fn show_entries(
    entries: &[CatalogEntry],
    json: bool,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    if json {
        let output = serde_json::to_string_pretty(entries).map_err(anyhow::Error::from)?;
        ui.message(&output);
        return Ok(());
    }

    let width = entries
        .iter()
        .map(|e| e.id.chars().count())
        .max()
        .unwrap_or(0);
    for entry in entries {
        ui.message(&format!(
            "{:<width$}  {} ({} lines)",
            entry.id,
            entry.display_name(),
            entry.line_count(),
            width = width
        ));
    }
    ui.message(&format!(
        "\n{} template{}",
        entries.len(),
        if entries.len() == 1 { "" } else { "s" }
    ));
    Ok(())
}
