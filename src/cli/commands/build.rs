//! The `depot build` command.

use std::path::{Path, PathBuf};

use crate::config::resolve_config;
use crate::error::Result;
use crate::frontend::FrontendBuilder;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::system_runner;

/// Builds the UI bundle for the configured base path.
pub struct BuildCommand {
    project_root: PathBuf,
}

impl BuildCommand {
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
        }
    }
}

impl Command for BuildCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = resolve_config(&self.project_root)?;
        ui.show_header(&format!("{} · build", config.display_name()));

        let runner = system_runner(ui);
        let builder = FrontendBuilder::new(&runner, &config, &self.project_root);

        let mut spinner = ui.start_spinner(&format!(
            "Building UI with {}={}",
            config.frontend.base_path_var, config.frontend.base_path
        ));
        match builder.build_with(|spec| spinner.set_message(&format!("Running {}", spec))) {
            Ok(report) => {
                spinner.finish_success(&format!("Built {}", report.index.display()));
                Ok(CommandResult::success())
            }
            Err(e) => {
                spinner.finish_error("UI build failed");
                Err(e)
            }
        }
    }
}
