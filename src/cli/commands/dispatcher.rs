//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::error::Result;
use crate::registry::TemplateResolver;
use crate::ui::UserInterface;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command, writing output through `ui`.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    settings: Settings,
}

impl CommandDispatcher {
    /// Create a dispatcher for already-loaded settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Dispatch and execute a command.
    ///
    /// Only commands that touch templates build a resolver.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::Fit(args) => {
                super::fit::FitCommand::new(self.settings.fit_params()?, args.clone()).execute(ui)
            }
            Commands::Resolve(args) => {
                super::resolve::ResolveCommand::new(&self.resolver()?, args.clone()).execute(ui)
            }
            Commands::Search(args) => {
                super::search::SearchCommand::new(&self.resolver()?, args.clone()).execute(ui)
            }
            Commands::List(args) => {
                super::list::ListCommand::new(&self.resolver()?, args.clone()).execute(ui)
            }
            Commands::Layout(args) => super::layout::LayoutCommand::new(
                &self.resolver()?,
                self.settings.fit_params()?,
                args.clone(),
            )
            .execute(ui),
            Commands::Cache(args) => {
                super::cache::CacheCommand::new(&self.resolver()?, args.clone()).execute(ui)
            }
        }
    }

    fn resolver(&self) -> Result<TemplateResolver> {
        TemplateResolver::from_settings(&self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use clap::Parser;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn dispatches_fit_without_network() {
        let cli = Cli::parse_from(["memeplate", "fit", "hello"]);
        let dispatcher = CommandDispatcher::new(Settings::default());
        let mut ui = MockUI::new();

        let result = dispatcher.dispatch(&cli, &mut ui).unwrap();
        assert!(result.success);
        assert_eq!(ui.field_value("lines"), Some("1"));
    }

    #[test]
    fn fit_ignores_unusable_cache_settings() {
        let mut settings = Settings::default();
        settings.cache.catalog_ttl = "never".to_string();
        let cli = Cli::parse_from(["memeplate", "fit", "hello"]);
        let mut ui = MockUI::new();

        let result = CommandDispatcher::new(settings).dispatch(&cli, &mut ui).unwrap();
        assert!(result.success);
    }

    #[test]
    fn resolver_commands_surface_bad_cache_settings() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.cache.dir = Some(temp.path().to_path_buf());
        settings.cache.catalog_ttl = "never".to_string();
        let cli = Cli::parse_from(["memeplate", "list"]);

        let result = CommandDispatcher::new(settings).dispatch(&cli, &mut MockUI::new());
        assert!(matches!(result, Err(crate::error::MemeplateError::InvalidConfig { .. })));
    }

    #[test]
    fn invalid_fit_settings_fail_dispatch() {
        let mut settings = Settings::default();
        settings.fit.max_iterations = 0;
        let cli = Cli::parse_from(["memeplate", "fit", "hello"]);

        let result = CommandDispatcher::new(settings).dispatch(&cli, &mut MockUI::new());
        assert!(result.is_err());
    }
}
