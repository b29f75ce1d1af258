//! Plain line-oriented UI for CI, pipes and service managers.

use super::{OutputMode, SpinnerHandle, UserInterface};

/// UI without colors or redraws. Every event is one line.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn output(&mut self, text: &str) {
        if self.mode.shows_spinners() {
            println!("{}", text);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_spinners() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_spinners() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_status() {
            println!("    {}", hint);
        }
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("{}", title);
        }
    }

    fn show_stage(&mut self, current: usize, total: usize, name: &str) {
        if self.mode.shows_status() {
            println!("[{}/{}] {}", current, total, name);
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_status() {
            println!("  {}", message);
        }
        Box::new(LineSpinner { mode: self.mode })
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Prints the outcome of an operation as a single line.
struct LineSpinner {
    mode: OutputMode,
}

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("  {}", msg);
        }
    }

    fn finish_success(&mut self, msg: &str) {
        if self.mode.shows_spinners() {
            println!("  ✓ {}", msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("  ✗ {}", msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        if self.mode.shows_spinners() {
            println!("  ○ {}", msg);
        }
    }
}
