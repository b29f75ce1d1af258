//! Output verbosity.

use std::time::Duration;

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show everything, including child command output.
    Verbose,
    /// Show progress and status.
    #[default]
    Normal,
    /// Show spinners and final status only.
    Quiet,
    /// Show nothing except errors.
    Silent,
}

impl OutputMode {
    /// Whether child processes write straight to the terminal.
    pub fn shows_command_output(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    pub fn shows_spinners(&self) -> bool {
        !matches!(self, Self::Silent)
    }

    /// Informational lines (headers, stage names, hints).
    pub fn shows_status(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }
}

/// Short human form: `420ms`, `3.2s`, `1.5m`.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}
