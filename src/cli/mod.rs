//! Command-line interface for depot.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    BootstrapArgs, CheckArgs, Cli, Commands, CompletionsArgs, ConfigArgs, HealthArgs, InitArgs,
    LaunchArgs,
};
pub use commands::{Command, CommandDispatcher, CommandResult};
