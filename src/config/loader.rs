//! Configuration file discovery and loading.
//!
//! This module handles finding and loading configuration files from
//! the project's `.depot` directory in the correct priority order.

use crate::config::merger::merge_configs;
use crate::config::schema::DepotConfig;
use crate::error::{DepotError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding depot's configuration files.
pub const CONFIG_DIR: &str = ".depot";

/// Paths to configuration files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. Built-in defaults
/// 2. Project config (`.depot/config.yml`)
/// 3. Local overrides (`.depot/config.local.yml`)
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project config: .depot/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .depot/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            project: existing(project_config_path(project_root)),
            project_local: existing(project_root.join(CONFIG_DIR).join("config.local.yml")),
        }
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(self.project_local.iter()).collect()
    }

    /// Check if any project config exists.
    pub fn has_project_config(&self) -> bool {
        self.project.is_some()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Location of the project config file, whether or not it exists.
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join("config.yml")
}

/// Find the project root by walking up from `start`.
///
/// Looks for:
/// 1. `.depot` directory (primary indicator)
/// 2. A directory holding both `backend` and `frontend` (fallback)
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_DIR).is_dir() {
            return Some(current);
        }

        if current.join("backend").is_dir() && current.join("frontend").is_dir() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Parse YAML content into DepotConfig.
pub fn parse_config(content: &str, source_path: &Path) -> Result<DepotConfig> {
    if content.trim().is_empty() {
        return Ok(DepotConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| DepotError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a config file as raw YAML Value (for merging).
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path)?;

    serde_yaml::from_str(&content).map_err(|e| DepotError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and merge all config files for a project.
///
/// A project without any config file gets the built-in defaults.
///
/// # Errors
///
/// Returns `ConfigParseError` if any config file is invalid.
pub fn load_merged_config(project_root: &Path) -> Result<DepotConfig> {
    let paths = ConfigPaths::discover(project_root);

    let mut configs = Vec::new();
    for path in paths.all_existing() {
        tracing::debug!("Loading config layer {}", path.display());
        configs.push(load_config_value(path)?);
    }

    if configs.is_empty() {
        tracing::debug!("No config files found, using defaults");
        return Ok(DepotConfig::default());
    }

    let merged = merge_configs(&configs);

    serde_yaml::from_value(merged).map_err(|e| DepotError::ConfigParseError {
        path: project_config_path(project_root),
        message: format!("Failed to parse merged config: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(root: &Path, name: &str, content: &str) {
        let dir = root.join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn discover_finds_project_and_local() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "config.yml", "app_name: test");
        write_config(temp.path(), "config.local.yml", "");

        let paths = ConfigPaths::discover(temp.path());
        assert!(paths.has_project_config());
        assert!(paths.project_local.is_some());
        assert_eq!(paths.all_existing().len(), 2);
        assert!(paths.all_existing()[0].ends_with("config.yml"));
    }

    #[test]
    fn discover_returns_none_for_missing_configs() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::discover(temp.path());
        assert!(!paths.has_project_config());
        assert!(paths.all_existing().is_empty());
    }

    #[test]
    fn find_project_root_finds_depot_dir() {
        let temp = TempDir::new().unwrap();
        let subdir = temp.path().join("backend").join("services");
        fs::create_dir_all(&subdir).unwrap();
        fs::create_dir_all(temp.path().join(CONFIG_DIR)).unwrap();

        assert_eq!(find_project_root(&subdir), Some(temp.path().to_path_buf()));
    }

    #[test]
    fn find_project_root_finds_backend_frontend_pair() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("backend")).unwrap();
        fs::create_dir_all(temp.path().join("frontend").join("src")).unwrap();

        let start = temp.path().join("frontend").join("src");
        assert_eq!(find_project_root(&start), Some(temp.path().to_path_buf()));
    }

    #[test]
    fn load_without_files_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config, DepotConfig::default());
    }

    #[test]
    fn local_overrides_project() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            "config.yml",
            "app_name: Vault\nserver:\n  port: 9000\n  log_level: debug\n",
        );
        write_config(temp.path(), "config.local.yml", "server:\n  port: 9100\n");

        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.app_name.as_deref(), Some("Vault"));
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.log_level.as_str(), "debug");
    }

    #[test]
    fn empty_local_file_is_ignored() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "config.yml", "server:\n  port: 9000\n");
        write_config(temp.path(), "config.local.yml", "");

        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "config.yml", "server: [unclosed");

        let err = load_merged_config(temp.path()).unwrap_err();
        assert!(matches!(err, DepotError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.yml"));
    }

    #[test]
    fn parse_config_accepts_empty_content() {
        let config = parse_config("  \n", Path::new("config.yml")).unwrap();
        assert_eq!(config.server.port, 8008);
    }
}
