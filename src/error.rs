//! Error types for depot operations.
//!
//! This module defines [`DepotError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! Every startup failure is fatal. The variants mirror the four failure
//! classes of the launch pipeline so callers can tell them apart:
//!
//! - missing prerequisites (interpreter, tool or manifest not found)
//! - installation failures (venv creation, dependency install)
//! - artifact preconditions (UI bundle missing or built for the wrong base path)
//! - resource conflicts (port already bound)
//!
//! Use `anyhow::Error` (via `DepotError::Other`) for unexpected errors.
//! All errors should tell the operator what to do next.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for depot operations.
#[derive(Debug, Error)]
pub enum DepotError {
    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A required interpreter, tool or file is not available.
    #[error("Missing prerequisite '{what}': {message}")]
    MissingPrerequisite { what: String, message: String },

    /// Environment creation or dependency installation failed.
    #[error("Installation failed during {stage}: {message}")]
    InstallFailed { stage: String, message: String },

    /// The built UI bundle does not exist.
    #[error("UI bundle not found at {path}. {hint}")]
    ArtifactMissing { path: PathBuf, hint: String },

    /// The built UI bundle exists but was built for another base path.
    #[error("UI bundle at {path} does not reference '{marker}'. {hint}")]
    ArtifactMisconfigured {
        path: PathBuf,
        marker: String,
        hint: String,
    },

    /// Another process already listens on the configured port.
    #[error("Port {port} is already in use by {}", describe_pids(.pids))]
    PortInUse { port: u16, pids: Vec<u32> },

    /// An external command could not be started.
    #[error("Could not start {command}: {message}")]
    CommandFailed { command: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn describe_pids(pids: &[u32]) -> String {
    match pids {
        [] => "an unknown process".to_string(),
        [pid] => format!("PID {}", pid),
        _ => {
            let list: Vec<String> = pids.iter().map(|p| p.to_string()).collect();
            format!("PIDs {}", list.join(", "))
        }
    }
}

/// Result type alias for depot operations.
pub type Result<T> = std::result::Result<T, DepotError>;
