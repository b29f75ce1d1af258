//! Mock UI implementation for testing.
//!
//! `MockUI` implements [`UserInterface`] and records every interaction,
//! including how each spinner finished.
//!
//! # Example
//!
//! ```
//! use depot::ui::{MockUI, SpinnerHandle, SpinnerStatus, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.show_stage(1, 4, "Bootstrap");
//! let mut spinner = ui.start_spinner("Installing dependencies");
//! spinner.finish_success("Dependencies installed");
//!
//! assert_eq!(ui.stages(), &["Bootstrap".to_string()]);
//! assert_eq!(
//!     ui.spinner_outcomes()[0],
//!     (SpinnerStatus::Success, "Dependencies installed".to_string())
//! );
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use super::{OutputMode, SpinnerHandle, UserInterface};

/// How a spinner was finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerStatus {
    Success,
    Error,
    Skipped,
}

type OutcomeLog = Rc<RefCell<Vec<(SpinnerStatus, String)>>>;

/// Records UI interactions for assertions.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    messages: Vec<String>,
    outputs: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    hints: Vec<String>,
    headers: Vec<String>,
    stages: Vec<String>,
    spinners: Vec<String>,
    outcomes: OutcomeLog,
    updates: Rc<RefCell<Vec<String>>>,
}

impl MockUI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Payloads written with [`UserInterface::output`].
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Stage names in the order they were announced.
    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    /// Messages of every spinner that was started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Final status and message of every finished spinner.
    pub fn spinner_outcomes(&self) -> Vec<(SpinnerStatus, String)> {
        self.outcomes.borrow().clone()
    }

    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Messages set on running spinners, in order.
    pub fn spinner_updates(&self) -> Vec<String> {
        self.updates.borrow().clone()
    }

    pub fn has_output(&self, text: &str) -> bool {
        self.outputs.iter().any(|m| m.contains(text))
    }

    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    pub fn has_hint(&self, msg: &str) -> bool {
        self.hints.iter().any(|m| m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn output(&mut self, text: &str) {
        self.outputs.push(text.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_hint(&mut self, hint: &str) {
        self.hints.push(hint.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_stage(&mut self, _current: usize, _total: usize, name: &str) {
        self.stages.push(name.to_string());
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner {
            outcomes: Rc::clone(&self.outcomes),
            updates: Rc::clone(&self.updates),
        })
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that reports its outcome back to the owning [`MockUI`].
pub struct MockSpinner {
    outcomes: OutcomeLog,
    updates: Rc<RefCell<Vec<String>>>,
}

impl MockSpinner {
    fn record(&self, status: SpinnerStatus, msg: &str) {
        self.outcomes.borrow_mut().push((status, msg.to_string()));
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, msg: &str) {
        self.updates.borrow_mut().push(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        self.record(SpinnerStatus::Success, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.record(SpinnerStatus::Error, msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.record(SpinnerStatus::Skipped, msg);
    }
}
