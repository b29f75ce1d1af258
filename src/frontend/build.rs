//! Building the UI bundle with the correct base path.

use std::path::{Path, PathBuf};

use crate::bootstrap::run_checked;
use crate::config::DepotConfig;
use crate::error::{DepotError, Result};
use crate::shell::{CommandRunner, CommandSpec, Platform};

use super::gate::{ArtifactGate, ArtifactReport};

/// Runs the frontend's package manager to produce the bundle.
pub struct FrontendBuilder<'a> {
    runner: &'a dyn CommandRunner,
    dir: PathBuf,
    program: String,
    base_path_var: String,
    base_path: String,
    gate: ArtifactGate,
}

impl<'a> FrontendBuilder<'a> {
    /// Builder for a project's configured frontend.
    pub fn new(runner: &'a dyn CommandRunner, config: &DepotConfig, project_root: &Path) -> Self {
        let frontend = &config.frontend;
        Self {
            runner,
            dir: project_root.join(&frontend.dir),
            program: package_manager_program(&frontend.package_manager, Platform::current()),
            base_path_var: frontend.base_path_var.clone(),
            base_path: frontend.base_path.clone(),
            gate: ArtifactGate::from_config(config, project_root),
        }
    }

    /// The commands a build runs, in order.
    pub fn commands(&self) -> Vec<CommandSpec> {
        vec![
            self.command(["install"]),
            self.command(["run", "build"]),
        ]
    }

    /// Install frontend dependencies, build, then verify the output.
    pub fn build(&self) -> Result<ArtifactReport> {
        self.build_with(|_| {})
    }

    /// Like [`build`](Self::build), announcing each command before it runs.
    pub fn build_with<F>(&self, mut on_command: F) -> Result<ArtifactReport>
    where
        F: FnMut(&CommandSpec),
    {
        if !self.dir.is_dir() {
            return Err(DepotError::MissingPrerequisite {
                what: "frontend".to_string(),
                message: format!("no frontend directory at {}", self.dir.display()),
            });
        }

        for spec in self.commands() {
            tracing::info!("Running {}", spec);
            on_command(&spec);
            run_checked(self.runner, &spec, "frontend build")?;
        }

        self.gate.check()
    }

    fn command<const N: usize>(&self, args: [&str; N]) -> CommandSpec {
        CommandSpec::new(&self.program)
            .args(args)
            .cwd(&self.dir)
            .env(&self.base_path_var, &self.base_path)
    }
}

/// npm, pnpm and yarn ship as `.cmd` shims on Windows.
fn package_manager_program(name: &str, platform: Platform) -> String {
    match platform {
        Platform::Windows if Path::new(name).extension().is_none() => format!("{}.cmd", name),
        _ => name.to_string(),
    }
}
