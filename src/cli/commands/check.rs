//! The `depot check` command.
//!
//! Runs every launch precondition and reports all of them, instead of
//! stopping at the first failure like the pipeline does.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::bootstrap::{BootstrapPlan, InstallStamp, VenvState};
use crate::cli::args::CheckArgs;
use crate::config::{resolve_config, DepotConfig};
use crate::error::{DepotError, Result};
use crate::frontend::ArtifactGate;
use crate::launch::Mode;
use crate::port::{ListenerProbe, PortGuard, SystemProbe};
use crate::shell::{is_elevated, needs_privilege};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Warn,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckItem {
    pub name: &'static str,
    pub status: CheckStatus,
    pub detail: String,
}

impl CheckItem {
    fn new(name: &'static str, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name,
            status,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub mode: Mode,
    pub ok: bool,
    pub checks: Vec<CheckItem>,
}

/// Collect every check for a project.
pub fn run_checks(
    config: &DepotConfig,
    mode: Mode,
    project_root: &Path,
    probe: &dyn ListenerProbe,
) -> CheckReport {
    let plan = BootstrapPlan::from_config(config, project_root);
    let mut checks = Vec::new();

    checks.push(match plan.venv.state() {
        VenvState::Ready => CheckItem::new(
            "environment",
            CheckStatus::Ok,
            plan.venv.root().display().to_string(),
        ),
        VenvState::Missing => CheckItem::new(
            "environment",
            CheckStatus::Fail,
            format!("{} does not exist. Run 'depot bootstrap'.", plan.venv.root().display()),
        ),
        VenvState::Broken => CheckItem::new(
            "environment",
            CheckStatus::Fail,
            format!(
                "{} has no interpreter. Run 'depot bootstrap --recreate'.",
                plan.venv.root().display()
            ),
        ),
    });

    checks.push(match InstallStamp::load(plan.venv.root()) {
        Some(stamp) if stamp.is_current(&plan.requirements) => CheckItem::new(
            "dependencies",
            CheckStatus::Ok,
            format!("installed {}", stamp.installed_at.format("%Y-%m-%d %H:%M UTC")),
        ),
        Some(_) => CheckItem::new(
            "dependencies",
            CheckStatus::Warn,
            format!(
                "{} changed since the last install. Run 'depot bootstrap'.",
                plan.requirements.display()
            ),
        ),
        None => CheckItem::new(
            "dependencies",
            CheckStatus::Warn,
            "no record of a depot install. Run 'depot bootstrap'.",
        ),
    });

    let gate = ArtifactGate::from_config(config, project_root);
    checks.push(match gate.check() {
        Ok(report) => CheckItem::new(
            "ui bundle",
            CheckStatus::Ok,
            format!("{} references {}", report.index.display(), report.marker),
        ),
        Err(e) if mode.enforces_artifacts() => {
            CheckItem::new("ui bundle", CheckStatus::Fail, e.to_string())
        }
        Err(e) => CheckItem::new("ui bundle", CheckStatus::Warn, e.to_string()),
    });

    let port = config.server.port;
    checks.push(match PortGuard::new(probe).check(port) {
        Ok(()) if needs_privilege(port) && !is_elevated() => CheckItem::new(
            "port",
            CheckStatus::Warn,
            format!("{} is free but binding it needs root", port),
        ),
        Ok(()) => CheckItem::new("port", CheckStatus::Ok, format!("{} is free", port)),
        Err(e @ DepotError::PortInUse { .. }) => {
            CheckItem::new("port", CheckStatus::Fail, e.to_string())
        }
        Err(e) => CheckItem::new("port", CheckStatus::Warn, format!("could not check: {}", e)),
    });

    CheckReport {
        mode,
        ok: checks.iter().all(|c| c.status != CheckStatus::Fail),
        checks,
    }
}

/// Reports launch readiness.
pub struct CheckCommand {
    project_root: PathBuf,
    args: CheckArgs,
}

impl CheckCommand {
    pub fn new(project_root: &Path, args: CheckArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = resolve_config(&self.project_root)?;
        let report = run_checks(&config, self.args.mode, &self.project_root, &SystemProbe::new());

        if self.args.json {
            let json = serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?;
            ui.output(&json);
        } else {
            ui.show_header(&format!("{} · {} checks", config.display_name(), self.args.mode));
            for check in &report.checks {
                let line = format!("{}: {}", check.name, check.detail);
                match check.status {
                    CheckStatus::Ok => ui.success(&line),
                    CheckStatus::Warn => ui.warning(&line),
                    CheckStatus::Fail => ui.error(&line),
                }
            }
        }

        if report.ok {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}
