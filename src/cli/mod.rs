//! Command-line interface for memeplate.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, FitArgs, LayoutArgs, ListArgs, ResolveArgs, SearchArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
