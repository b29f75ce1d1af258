//! Configuration schema definitions for depot.
//!
//! This module contains all the struct definitions that map to
//! the `.depot/config.yml` file format. Every field has a default, so a
//! project with the standard `backend/` + `frontend/` layout needs no
//! config file at all.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for `.depot/config.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DepotConfig {
    /// Application name (for display purposes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    /// Python backend and its isolated environment
    pub backend: BackendConfig,

    /// Built UI bundle served by the backend
    pub frontend: FrontendConfig,

    /// Server bind and runtime settings
    pub server: ServerConfig,
}

impl DepotConfig {
    /// Display name used in headers.
    pub fn display_name(&self) -> &str {
        self.app_name.as_deref().unwrap_or("asset manager")
    }
}

/// Backend location and dependency environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend directory (relative to project root)
    pub dir: PathBuf,

    /// Virtual environment directory (relative to backend dir)
    pub venv_dir: PathBuf,

    /// Dependency manifest (relative to backend dir)
    pub requirements: PathBuf,

    /// Interpreter names searched on PATH, in order
    pub interpreters: Vec<String>,

    /// ASGI application passed to uvicorn
    pub app: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("backend"),
            venv_dir: PathBuf::from(".venv"),
            requirements: PathBuf::from("requirements.txt"),
            interpreters: default_interpreters(),
            app: "main:app".to_string(),
        }
    }
}

fn default_interpreters() -> Vec<String> {
    if cfg!(windows) {
        vec!["py".to_string(), "python".to_string()]
    } else {
        vec!["python3".to_string(), "python".to_string()]
    }
}

/// Frontend bundle location and build settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FrontendConfig {
    /// Frontend directory (relative to project root)
    pub dir: PathBuf,

    /// Build output directory (relative to frontend dir)
    pub dist_dir: PathBuf,

    /// Entry file that must exist in the build output
    pub index_file: String,

    /// Base path the UI is served under
    pub base_path: String,

    /// Build-time variable that sets the base path
    pub base_path_var: String,

    /// Package manager used for `depot build`
    pub package_manager: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("frontend"),
            dist_dir: PathBuf::from("dist"),
            index_file: "index.html".to_string(),
            base_path: "/ui/".to_string(),
            base_path_var: "VITE_BASE_PATH".to_string(),
            package_manager: "npm".to_string(),
        }
    }
}

impl FrontendConfig {
    /// The substring a correctly built index file must contain.
    pub fn marker(&self) -> String {
        format!("{}assets/", self.base_path)
    }
}

/// Server bind and runtime settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ServerConfig {
    /// TCP port
    pub port: u16,

    /// uvicorn log level
    pub log_level: LogLevel,

    /// Bind host in dev mode
    pub dev_host: String,

    /// Bind host in prod mode
    pub prod_host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8008,
            log_level: LogLevel::Info,
            dev_host: "127.0.0.1".to_string(),
            prod_host: "0.0.0.0".to_string(),
        }
    }
}

/// uvicorn log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Critical,
    Error,
    Warning,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// The value passed to `--log-level`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "error" => Ok(Self::Error),
            "warning" | "warn" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(format!("unknown log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
