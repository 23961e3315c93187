//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands are
//! routed by [`CommandDispatcher`], which builds the shared
//! [`TemplateResolver`](crate::registry::TemplateResolver) from settings.

pub mod cache;
pub mod dispatcher;
pub mod fit;
pub mod layout;
pub mod list;
pub mod resolve;
pub mod search;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
