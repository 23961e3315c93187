//! Terminal output.
//!
//! Commands write through the [`UserInterface`] trait so tests can capture
//! output with [`MockUI`] instead of a real terminal.

pub mod mock;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, MemeplateTheme};

/// Output sink for commands.
pub trait UserInterface {
    /// Plain output, e.g. a result line or JSON document.
    fn message(&mut self, msg: &str);

    fn success(&mut self, msg: &str);

    fn warning(&mut self, msg: &str);

    fn error(&mut self, msg: &str);

    fn show_header(&mut self, title: &str);

    /// A labelled value.
    fn field(&mut self, key: &str, value: &str);
}
