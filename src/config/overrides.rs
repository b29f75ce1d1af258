//! Environment variable overrides.
//!
//! Operators can adjust a handful of settings for a single run without
//! editing config files. Overrides are read once at the orchestration
//! boundary and folded into the typed [`DepotConfig`]; nothing downstream
//! reads the process environment again.

use crate::config::schema::{DepotConfig, LogLevel};
use crate::error::{DepotError, Result};
use std::path::PathBuf;

/// Override for `server.port`.
pub const PORT_VAR: &str = "DEPOT_PORT";
/// Override for the bind host of the selected mode.
pub const HOST_VAR: &str = "DEPOT_HOST";
/// Override for `server.log_level`.
pub const LOG_LEVEL_VAR: &str = "DEPOT_LOG_LEVEL";
/// Override for `backend.dir`.
pub const BACKEND_DIR_VAR: &str = "DEPOT_BACKEND_DIR";
/// Override for `frontend.dir`.
pub const FRONTEND_DIR_VAR: &str = "DEPOT_FRONTEND_DIR";

/// Apply overrides from the real process environment.
pub fn apply_env_overrides(config: &mut DepotConfig) -> Result<()> {
    apply_env_overrides_with(config, |key: &str| std::env::var(key))
}

/// Apply overrides using a custom env var lookup function.
///
/// This allows testing without modifying actual environment variables.
/// `DEPOT_HOST` replaces both the dev and prod host so the selected mode
/// always sees it.
pub fn apply_env_overrides_with<F>(config: &mut DepotConfig, env_fn: F) -> Result<()>
where
    F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
{
    let lookup = |key: &str| {
        env_fn(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if let Some(raw) = lookup(PORT_VAR) {
        config.server.port = raw
            .parse::<u16>()
            .map_err(|_| DepotError::ConfigValidationError {
                message: format!("{} must be a port number, got '{}'", PORT_VAR, raw),
            })?;
        tracing::debug!("{} overrides port to {}", PORT_VAR, config.server.port);
    }

    if let Some(host) = lookup(HOST_VAR) {
        tracing::debug!("{} overrides bind host to {}", HOST_VAR, host);
        config.server.dev_host = host.clone();
        config.server.prod_host = host;
    }

    if let Some(raw) = lookup(LOG_LEVEL_VAR) {
        config.server.log_level =
            raw.parse::<LogLevel>()
                .map_err(|message| DepotError::ConfigValidationError {
                    message: format!("{}: {}", LOG_LEVEL_VAR, message),
                })?;
    }

    if let Some(dir) = lookup(BACKEND_DIR_VAR) {
        config.backend.dir = PathBuf::from(dir);
    }

    if let Some(dir) = lookup(FRONTEND_DIR_VAR) {
        config.frontend.dir = PathBuf::from(dir);
    }

    Ok(())
}
