//! Search command implementation.

use crate::cli::args::SearchArgs;
use crate::error::Result;
use crate::registry::TemplateResolver;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::list::show_entries;

/// The search command implementation.
pub struct SearchCommand<'a> {
    resolver: &'a TemplateResolver,
    args: SearchArgs,
}

impl<'a> SearchCommand<'a> {
    pub fn new(resolver: &'a TemplateResolver, args: SearchArgs) -> Self {
        Self { resolver, args }
    }
}

impl Command for SearchCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let matches = self.resolver.search(&self.args.query)?;

        if matches.is_empty() && !self.args.json {
            ui.warning(&format!("No templates match '{}'", self.args.query));
            return Ok(CommandResult::failure(1));
        }

        show_entries(&matches, self.args.json, ui)?;
        Ok(CommandResult::success())
    }
}
