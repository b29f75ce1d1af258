//! The `depot health` command.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::args::HealthArgs;
use crate::config::resolve_config;
use crate::error::Result;
use crate::health::{health_url, probe};
use crate::launch::Mode;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Asks a running server whether it is healthy.
pub struct HealthCommand {
    project_root: PathBuf,
    args: HealthArgs,
}

impl HealthCommand {
    pub fn new(project_root: &Path, args: HealthArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }
}

impl Command for HealthCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = resolve_config(&self.project_root)?;
        let host = match (&self.args.host, self.args.mode) {
            (Some(host), _) => host.clone(),
            (None, Mode::Dev) => config.server.dev_host.clone(),
            (None, Mode::Prod) => config.server.prod_host.clone(),
        };
        let port = self.args.port.unwrap_or(config.server.port);
        let url = health_url(&host, port);

        let report = probe(&url, Duration::from_secs(self.args.timeout))?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?;
            ui.output(&json);
        } else if report.healthy {
            ui.success(&format!("{} answered {}", report.url, report.status));
        } else {
            ui.error(&format!("{} answered {}", report.url, report.status));
        }
        if !self.args.json && !report.body.is_empty() {
            ui.output(&report.body);
        }

        if report.healthy {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}
