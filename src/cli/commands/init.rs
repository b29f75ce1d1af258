//! The `depot init` command.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::args::InitArgs;
use crate::config::{project_config_path, DepotConfig};
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

const HEADER: &str = "\
# depot configuration
#
# Every key is optional; removing one restores its default.
# Machine-specific overrides belong in .depot/config.local.yml.
";

/// Writes a config file holding every default.
pub struct InitCommand {
    project_root: PathBuf,
    args: InitArgs,
}

impl InitCommand {
    pub fn new(project_root: &Path, args: InitArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }
}

/// The file `depot init` writes.
pub fn default_config_yaml() -> Result<String> {
    let body = serde_yaml::to_string(&DepotConfig::default()).map_err(anyhow::Error::from)?;
    Ok(format!("{}\n{}", HEADER, body))
}

impl Command for InitCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let path = project_config_path(&self.project_root);

        if path.exists() && !self.args.force {
            ui.error(&format!("{} already exists", path.display()));
            ui.show_hint("Use --force to overwrite it.");
            return Ok(CommandResult::failure(1));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, default_config_yaml()?)?;

        ui.success(&format!("Wrote {}", path.display()));
        Ok(CommandResult::success())
    }
}
