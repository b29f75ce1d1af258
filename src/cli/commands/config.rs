//! The `depot config` command.

use std::path::{Path, PathBuf};

use crate::cli::args::ConfigArgs;
use crate::config::{resolve_config, ConfigPaths, DepotConfig};
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Shows the configuration after files, defaults and env overrides.
pub struct ConfigCommand {
    project_root: PathBuf,
    args: ConfigArgs,
}

impl ConfigCommand {
    pub fn new(project_root: &Path, args: ConfigArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.schema {
            let schema = schemars::schema_for!(DepotConfig);
            let json = serde_json::to_string_pretty(&schema).map_err(anyhow::Error::from)?;
            ui.output(&json);
            return Ok(CommandResult::success());
        }

        let config = resolve_config(&self.project_root)?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&config).map_err(anyhow::Error::from)?;
            ui.output(&json);
            return Ok(CommandResult::success());
        }

        let paths = ConfigPaths::discover(&self.project_root);
        let existing = paths.all_existing();
        if existing.is_empty() {
            ui.output("# no config files, using defaults");
        }
        for path in existing {
            ui.output(&format!("# {}", path.display()));
        }
        let yaml = serde_yaml::to_string(&config).map_err(anyhow::Error::from)?;
        ui.output(yaml.trim_end());

        Ok(CommandResult::success())
    }
}
