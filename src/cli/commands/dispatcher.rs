//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    ///
    /// Errors abort with exit code 1. A command that wants a different
    /// exit code (for example the server's own) returns it in the result.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Result mirroring a child process exit code.
    pub fn from_exit_code(exit_code: i32) -> Self {
        Self {
            success: exit_code == 0,
            exit_code,
        }
    }

    /// Code for the depot process itself. Anything a process exit status
    /// cannot carry (negative NTSTATUS crash codes, values above 255) is a
    /// failure.
    pub fn process_exit_code(&self) -> u8 {
        u8::try_from(self.exit_code).unwrap_or(1)
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
}

impl CommandDispatcher {
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Route the CLI subcommand to its implementation and execute it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let root = &self.project_root;
        match &cli.command {
            Commands::Dev(args) => {
                super::launch::LaunchCommand::new(root, crate::launch::Mode::Dev, args.clone())
                    .execute(ui)
            }
            Commands::Start(args) => {
                super::launch::LaunchCommand::new(root, crate::launch::Mode::Prod, args.clone())
                    .execute(ui)
            }
            Commands::Bootstrap(args) => {
                super::bootstrap::BootstrapCommand::new(root, args.clone()).execute(ui)
            }
            Commands::Build => super::build::BuildCommand::new(root).execute(ui),
            Commands::Check(args) => super::check::CheckCommand::new(root, args.clone()).execute(ui),
            Commands::Health(args) => {
                super::health::HealthCommand::new(root, args.clone()).execute(ui)
            }
            Commands::Init(args) => super::init::InitCommand::new(root, args.clone()).execute(ui),
            Commands::Config(args) => {
                super::config::ConfigCommand::new(root, args.clone()).execute(ui)
            }
            Commands::Completions(args) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
        }
    }
}
