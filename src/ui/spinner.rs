//! Progress spinners.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

use super::output::format_duration;
use super::theme::DepotTheme;
use super::SpinnerHandle;

/// A spinner shown while a stage runs.
pub struct ProgressSpinner {
    bar: ProgressBar,
    theme: DepotTheme,
    started: Instant,
}

impl ProgressSpinner {
    pub fn new(message: &str, theme: DepotTheme) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self {
            bar,
            theme,
            started: Instant::now(),
        }
    }

    /// A spinner that draws nothing (silent mode).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            theme: DepotTheme::plain(),
            started: Instant::now(),
        }
    }

    fn finish(&mut self, line: String) {
        let style = ProgressStyle::default_spinner()
            .template("  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        self.bar.set_style(style);
        self.bar.finish_with_message(line);
    }

    fn elapsed(&self) -> String {
        self.theme
            .dim
            .apply_to(format_duration(self.started.elapsed()))
            .to_string()
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        let line = format!("{} {}", self.theme.format_success(msg), self.elapsed());
        self.finish(line);
    }

    fn finish_error(&mut self, msg: &str) {
        let line = self.theme.format_error(msg);
        self.finish(line);
    }

    fn finish_skipped(&mut self, msg: &str) {
        let line = self.theme.format_skipped(msg);
        self.finish(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_spinner_finishes() {
        let mut spinner = ProgressSpinner::hidden();
        spinner.set_message("Installing");
        spinner.finish_success("Installed");
        assert!(spinner.bar.is_finished());
    }

    #[test]
    fn finish_error_replaces_message() {
        let mut spinner = ProgressSpinner::hidden();
        spinner.finish_error("Port 8008 is busy");
        assert!(spinner.bar.message().contains("Port 8008 is busy"));
    }

    #[test]
    fn visible_spinner_can_be_created() {
        let mut spinner = ProgressSpinner::new("Checking", DepotTheme::plain());
        spinner.finish_skipped("Skipped");
    }
}
