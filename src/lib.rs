//! depot - bootstrap, verify and launch the asset manager backend.
//!
//! depot prepares an isolated Python environment, checks that the UI bundle
//! was built for the right base path, makes sure the port is free, and then
//! hands the process over to uvicorn.
//!
//! # Modules
//!
//! - [`bootstrap`] - Interpreter detection, venv creation and dependency install
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`frontend`] - UI bundle build and artifact gate
//! - [`health`] - Probing a running server
//! - [`launch`] - Server settings, launch plans and process hand-off
//! - [`pipeline`] - The staged launch sequence
//! - [`port`] - Port conflict detection
//! - [`shell`] - Child command execution and platform details
//! - [`ui`] - Spinners and terminal output
//!
//! # Example
//!
//! ```
//! use depot::config::DepotConfig;
//! use depot::launch::{Mode, ServerSettings};
//! use std::path::Path;
//!
//! let config = DepotConfig::default();
//! let settings = ServerSettings::for_mode(&config, Mode::Dev, Path::new("/srv/app"));
//! assert_eq!(settings.host, "127.0.0.1");
//! assert!(settings.reload);
//! ```

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod error;
pub mod frontend;
pub mod health;
pub mod launch;
pub mod pipeline;
pub mod port;
pub mod shell;
pub mod ui;

pub use error::{DepotError, Result};
