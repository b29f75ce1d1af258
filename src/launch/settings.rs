//! Typed server settings.
//!
//! Built once at the orchestration boundary and handed to the server
//! process through its argv and environment. depot itself never writes
//! to its own process environment.

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{DepotConfig, LogLevel};
use crate::frontend::dist_dir;

/// Launch mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Loopback only, auto-reload, UI bundle optional.
    Dev,
    /// All interfaces, no reload, UI bundle required.
    #[default]
    Prod,
}

impl Mode {
    /// Whether a bad UI bundle aborts the launch.
    pub fn enforces_artifacts(&self) -> bool {
        matches!(self, Mode::Prod)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Dev => write!(f, "dev"),
            Mode::Prod => write!(f, "prod"),
        }
    }
}

/// Everything the server process needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerSettings {
    /// Serve the bundled UI from the backend.
    pub serve_ui: bool,
    /// Location of the built UI bundle.
    pub ui_dist: PathBuf,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Server log verbosity.
    pub log_level: LogLevel,
    /// Restart on source changes.
    pub reload: bool,
    /// Working directory of the server.
    pub workdir: PathBuf,
}

impl ServerSettings {
    pub fn for_mode(config: &DepotConfig, mode: Mode, project_root: &Path) -> Self {
        let server = &config.server;
        let host = match mode {
            Mode::Dev => &server.dev_host,
            Mode::Prod => &server.prod_host,
        };
        Self {
            serve_ui: true,
            ui_dist: dist_dir(config, project_root),
            host: host.clone(),
            port: server.port,
            log_level: server.log_level,
            reload: mode == Mode::Dev,
            workdir: project_root.join(&config.backend.dir),
        }
    }

    /// Environment variables the server reads at startup.
    pub fn to_env(&self) -> Vec<(String, String)> {
        vec![
            ("SERVE_FRONTEND".to_string(), flag(self.serve_ui)),
            (
                "FRONTEND_DIST".to_string(),
                self.ui_dist.display().to_string(),
            ),
            ("HOST".to_string(), self.host.clone()),
            ("PORT".to_string(), self.port.to_string()),
            ("LOG_LEVEL".to_string(), self.log_level.to_string()),
            ("RELOAD".to_string(), flag(self.reload)),
        ]
    }
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_binds_loopback_with_reload() {
        let settings = ServerSettings::for_mode(&DepotConfig::default(), Mode::Dev, Path::new("/srv/app"));
        assert_eq!(settings.host, "127.0.0.1");
        assert!(settings.reload);
        assert_eq!(settings.port, 8008);
    }

    #[test]
    fn prod_binds_all_interfaces_without_reload() {
        let settings = ServerSettings::for_mode(&DepotConfig::default(), Mode::Prod, Path::new("/srv/app"));
        assert_eq!(settings.host, "0.0.0.0");
        assert!(!settings.reload);
        assert!(settings.serve_ui);
        assert_eq!(settings.workdir, PathBuf::from("/srv/app/backend"));
        assert_eq!(settings.ui_dist, PathBuf::from("/srv/app/frontend/dist"));
    }

    #[test]
    fn env_carries_every_setting() {
        let settings = ServerSettings::for_mode(&DepotConfig::default(), Mode::Dev, Path::new("/srv/app"));
        let env = settings.to_env();
        let get = |key: &str| {
            env.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("SERVE_FRONTEND"), Some("1"));
        assert_eq!(get("HOST"), Some("127.0.0.1"));
        assert_eq!(get("PORT"), Some("8008"));
        assert_eq!(get("LOG_LEVEL"), Some("info"));
        assert_eq!(get("RELOAD"), Some("1"));
        assert!(get("FRONTEND_DIST").is_some());
    }

    #[test]
    fn only_prod_enforces_artifacts() {
        assert!(Mode::Prod.enforces_artifacts());
        assert!(!Mode::Dev.enforces_artifacts());
        assert_eq!(Mode::Dev.to_string(), "dev");
    }
}
