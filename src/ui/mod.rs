//! Terminal output.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI, pipes and service managers
//! - [`MockUI`] for tests
//!
//! # Example
//!
//! ```
//! use depot::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Silent);
//! ui.show_header("asset manager");
//! ui.success("Environment ready");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI, SpinnerStatus};
pub use non_interactive::NonInteractiveUI;
pub use output::{format_duration, OutputMode};
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, DepotTheme};

/// Output sink for commands and the pipeline.
pub trait UserInterface {
    fn output_mode(&self) -> OutputMode;

    fn message(&mut self, msg: &str);

    /// Command payload (JSON, YAML, a rendered plan). Printed to stdout in
    /// every mode but silent so it can be piped.
    fn output(&mut self, text: &str);

    fn success(&mut self, msg: &str);

    fn warning(&mut self, msg: &str);

    /// Errors are shown in every output mode.
    fn error(&mut self, msg: &str);

    /// Remediation advice shown under a failure or warning.
    fn show_hint(&mut self, hint: &str);

    fn show_header(&mut self, title: &str);

    /// Announce pipeline stage `current` of `total`.
    fn show_stage(&mut self, current: usize, total: usize, name: &str);

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    fn is_interactive(&self) -> bool;
}

/// Handle for a running operation.
pub trait SpinnerHandle {
    fn set_message(&mut self, msg: &str);

    fn finish_success(&mut self, msg: &str);

    fn finish_error(&mut self, msg: &str);

    fn finish_skipped(&mut self, msg: &str);
}
