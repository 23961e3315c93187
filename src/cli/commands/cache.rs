//! Cache command implementation.
//!
//! Provides `memeplate cache stats`, `memeplate cache clear` and
//! `memeplate cache refresh`.

use clap::{Args, Subcommand};

use crate::cache::format_duration;
use crate::error::Result;
use crate::registry::TemplateResolver;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Arguments for the cache command.
#[derive(Debug, Clone, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheSubcommand,
}

/// Cache subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum CacheSubcommand {
    /// Show cache statistics.
    Stats,
    /// Delete the cache directory.
    Clear,
    /// Re-fetch the template catalog, ignoring its age.
    Refresh,
}

/// The cache command implementation.
pub struct CacheCommand<'a> {
    resolver: &'a TemplateResolver,
    args: CacheArgs,
}

impl<'a> CacheCommand<'a> {
    pub fn new(resolver: &'a TemplateResolver, args: CacheArgs) -> Self {
        Self { resolver, args }
    }
}

impl Command for CacheCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &self.args.command {
            CacheSubcommand::Stats => show_stats(self.resolver, ui)?,
            CacheSubcommand::Clear => {
                self.resolver.template_cache().clear()?;
                ui.success(&format!(
                    "Cleared {}",
                    self.resolver.template_cache().root().display()
                ));
            }
            CacheSubcommand::Refresh => {
                let entries = self.resolver.refresh()?;
                ui.success(&format!("Fetched {} templates", entries.len()));
            }
        }
        Ok(CommandResult::success())
    }
}

fn show_stats(resolver: &TemplateResolver, ui: &mut dyn UserInterface) -> Result<()> {
    let cache = resolver.template_cache();
    let stats = cache.stats()?;

    ui.show_header("Cache Statistics");
    ui.field("location", &cache.root().display().to_string());
    ui.field(
        "enabled",
        if resolver.cache().is_some() { "yes" } else { "no" },
    );
    ui.field("images", &stats.disk_images.to_string());
    ui.field("size", &format!("{} bytes", stats.disk_bytes));
    ui.field(
        "catalog",
        &match stats.catalog_age {
            Some(age) => format!("fetched {} ago", format_duration(age)),
            None => "not cached".to_string(),
        },
    );
    Ok(())
}
