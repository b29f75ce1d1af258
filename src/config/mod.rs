//! Configuration loading, parsing, and validation for depot.
//!
//! This module handles all aspects of configuration:
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Environment variable overrides in [`overrides`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use depot::config::{load_merged_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let depot_dir = temp.path().join(".depot");
//! fs::create_dir_all(&depot_dir).unwrap();
//! fs::write(depot_dir.join("config.yml"), "server:\n  port: 9000\n").unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.server.port, 9000);
//! ```
//!
//! # Configuration File Locations
//!
//! depot merges configuration in this order:
//! 1. Built-in defaults (port 8008, `backend/`, `frontend/dist`, `/ui/`)
//! 2. Project config (`.depot/config.yml`)
//! 3. Local overrides (`.depot/config.local.yml`)
//! 4. `DEPOT_*` environment variables

pub mod loader;
pub mod merger;
pub mod overrides;
pub mod schema;
pub mod validator;

use std::path::Path;

use crate::error::Result;

pub use schema::{BackendConfig, DepotConfig, FrontendConfig, LogLevel, ServerConfig};

pub use loader::{
    find_project_root, load_config_value, load_merged_config, parse_config,
    project_config_path, ConfigPaths, CONFIG_DIR,
};

pub use merger::{deep_merge, merge_configs};

pub use overrides::{apply_env_overrides, apply_env_overrides_with};

pub use validator::{validate, validate_config, ValidationError};

/// Load, override and validate the configuration for a project.
///
/// This is the single place where the process environment is consulted.
pub fn resolve_config(project_root: &Path) -> Result<DepotConfig> {
    let mut config = load_merged_config(project_root)?;
    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}
