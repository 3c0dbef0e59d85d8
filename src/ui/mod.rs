//! Terminal output.
//!
//! This module provides:
//! - [`UserInterface`] trait for output abstraction
//! - [`TerminalUI`] writing styled lines to stdout
//! - [`MockUI`] capturing output in tests
//!
//! # Example
//!
//! ```
//! use environaut::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.show_header("my-app");
//! ui.success("All checks passed");
//! assert_eq!(ui.successes(), ["All checks passed"]);
//! ```

pub mod mock;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, EnvironautTheme};

use crate::report::{Message, Severity};

/// Trait for user-facing output.
///
/// This trait allows capturing output in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Shown in every mode.
    fn error(&mut self, msg: &str);

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Write machine-readable output (JSON, scripts) verbatim.
    fn data(&mut self, text: &str);

    /// Display a check message styled by its severity.
    fn check_message(&mut self, message: &Message) {
        let line = format!("[{}] {}", message.name(), message.text());
        match message.severity() {
            Severity::Fatal | Severity::Error => self.error(&line),
            Severity::Warn => self.warning(&line),
            Severity::Notice | Severity::Info => self.message(&line),
            Severity::Debug => {
                if self.output_mode().shows_details() {
                    self.message(&line);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_message_routes_by_severity() {
        let mut ui = MockUI::new();
        ui.check_message(&Message::new("php", "missing", Severity::Error));
        ui.check_message(&Message::new("php", "old", Severity::Warn));
        ui.check_message(&Message::new("php", "found", Severity::Info));
        ui.check_message(&Message::new("php", "details", Severity::Debug));

        assert_eq!(ui.errors(), ["[php] missing"]);
        assert_eq!(ui.warnings(), ["[php] old"]);
        assert_eq!(ui.messages(), ["[php] found"]);
    }

    #[test]
    fn debug_messages_show_in_verbose_mode() {
        let mut ui = MockUI::with_mode(OutputMode::Verbose);
        ui.check_message(&Message::new("php", "details", Severity::Debug));
        assert_eq!(ui.messages(), ["[php] details"]);
    }
}
