//! The `depot dev` and `depot start` commands.

use std::path::{Path, PathBuf};

use crate::cli::args::LaunchArgs;
use crate::config::resolve_config;
use crate::error::Result;
use crate::launch::{Mode, ProcessLauncher};
use crate::pipeline::{Pipeline, PipelineOptions, Services};
use crate::port::SystemProbe;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::system_runner;

/// Runs the full start-up pipeline in one mode.
pub struct LaunchCommand {
    project_root: PathBuf,
    mode: Mode,
    args: LaunchArgs,
}

impl LaunchCommand {
    pub fn new(project_root: &Path, mode: Mode, args: LaunchArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            mode,
            args,
        }
    }

    fn options(&self) -> PipelineOptions {
        PipelineOptions {
            skip_install: self.args.skip_install,
            dry_run: self.args.dry_run,
            recreate: self.args.recreate,
        }
    }
}

impl Command for LaunchCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = resolve_config(&self.project_root)?;
        ui.show_header(&format!("{} · {} mode", config.display_name(), self.mode));

        let runner = system_runner(ui);
        let probe = SystemProbe::new();
        let launcher = ProcessLauncher;
        let services = Services::new(&runner, &probe, &launcher);

        let report = Pipeline::new(&config, self.mode, &self.project_root)
            .with_options(self.options())
            .run(&services, ui)?;

        match report.exit_code {
            None => Ok(CommandResult::success()),
            Some(code) => {
                if code != 0 {
                    ui.error(&format!("Server exited with code {}", code));
                }
                Ok(CommandResult::from_exit_code(code))
            }
        }
    }
}
