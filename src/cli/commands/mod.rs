//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and is routed by
//! [`CommandDispatcher`].

pub mod bootstrap;
pub mod build;
pub mod check;
pub mod completions;
pub mod config;
pub mod dispatcher;
pub mod health;
pub mod init;
pub mod launch;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

use crate::shell::SystemRunner;
use crate::ui::UserInterface;

/// Runner matching the output mode: installer output is streamed in
/// verbose mode and captured otherwise.
pub(crate) fn system_runner(ui: &dyn UserInterface) -> SystemRunner {
    if ui.output_mode().shows_command_output() {
        SystemRunner::inheriting()
    } else {
        SystemRunner::capturing()
    }
}
