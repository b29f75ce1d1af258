//! Starting the server in the foreground.

use crate::error::Result;
use crate::shell::spawn_error;

use super::plan::LaunchPlan;

/// Starts the server process described by a plan.
pub trait Launcher {
    /// Run the server in the foreground and return its exit code.
    ///
    /// Implementations that replace the current process never return on
    /// success.
    fn launch(&self, plan: &LaunchPlan) -> Result<i32>;
}

/// Launches the real server process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    #[cfg(unix)]
    fn launch(&self, plan: &LaunchPlan) -> Result<i32> {
        use std::os::unix::process::CommandExt;

        let spec = plan.to_spec();
        tracing::debug!("exec {}", spec);
        // Only returns if exec failed
        let err = spec.to_command().exec();
        Err(spawn_error(&spec, err))
    }

    #[cfg(not(unix))]
    fn launch(&self, plan: &LaunchPlan) -> Result<i32> {
        let spec = plan.to_spec();
        tracing::debug!("spawn {}", spec);
        let status = spec
            .to_command()
            .status()
            .map_err(|e| spawn_error(&spec, e))?;
        Ok(status.code().unwrap_or(1))
    }
}
