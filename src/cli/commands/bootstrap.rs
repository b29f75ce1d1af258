//! The `depot bootstrap` command.

use std::path::{Path, PathBuf};

use crate::bootstrap::{BootstrapOptions, BootstrapPlan, Bootstrapper};
use crate::cli::args::BootstrapArgs;
use crate::config::resolve_config;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::system_runner;

/// Prepares the Python environment without launching anything.
pub struct BootstrapCommand {
    project_root: PathBuf,
    args: BootstrapArgs,
}

impl BootstrapCommand {
    pub fn new(project_root: &Path, args: BootstrapArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }
}

impl Command for BootstrapCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = resolve_config(&self.project_root)?;
        let plan = BootstrapPlan::from_config(&config, &self.project_root);
        ui.show_header(&format!("{} · bootstrap", config.display_name()));

        let runner = system_runner(ui);
        let options = BootstrapOptions {
            recreate: self.args.recreate,
            skip_install: false,
        };

        let mut spinner = ui.start_spinner(&format!(
            "Preparing {}",
            plan.venv.root().display()
        ));
        match Bootstrapper::new(&runner).ensure(&plan, options) {
            Ok(outcome) => {
                let verb = if outcome.created { "Created" } else { "Updated" };
                spinner.finish_success(&format!("{} {}", verb, plan.venv.root().display()));
                if let Some(version) = outcome.interpreter.and_then(|i| i.version) {
                    ui.message(&format!("Python {}", version));
                }
                Ok(CommandResult::success())
            }
            Err(e) => {
                spinner.finish_error("Bootstrap failed");
                Err(e)
            }
        }
    }
}
