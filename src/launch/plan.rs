//! The exact command that starts the server.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::shell::CommandSpec;

use super::settings::ServerSettings;

/// Program, arguments, environment and directory for the server process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchPlan {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub cwd: PathBuf,
}

impl LaunchPlan {
    /// `python -m uvicorn <app>` with the settings on argv and in the env.
    pub fn uvicorn(python: &Path, app: &str, settings: &ServerSettings) -> Self {
        let mut args = vec![
            "-m".to_string(),
            "uvicorn".to_string(),
            app.to_string(),
            "--host".to_string(),
            settings.host.clone(),
            "--port".to_string(),
            settings.port.to_string(),
            "--log-level".to_string(),
            settings.log_level.to_string(),
        ];
        if settings.reload {
            args.push("--reload".to_string());
        }

        Self {
            program: python.to_path_buf(),
            args,
            env: settings.to_env().into_iter().collect(),
            cwd: settings.workdir.clone(),
        }
    }

    pub fn to_spec(&self) -> CommandSpec {
        let mut spec = CommandSpec::new(&self.program)
            .args(&self.args)
            .cwd(&self.cwd);
        for (key, value) in &self.env {
            spec = spec.env(key, value);
        }
        spec
    }

    /// Human-readable form used by `--dry-run`.
    pub fn render(&self) -> String {
        let mut out = format!("cwd: {}\nenv:\n", self.cwd.display());
        for (key, value) in &self.env {
            out.push_str(&format!("  {}={}\n", key, value));
        }
        out.push_str(&format!("exec: {}", self.to_spec()));
        out
    }
}
