//! Platform detection.
//!
//! Venv layout, executable suffixes and process replacement differ between
//! Unix and Windows. [`Platform`] keeps those differences in one place.

use std::path::{Path, PathBuf};

/// Host platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    /// Platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Directory inside a virtual environment that holds executables.
    pub fn venv_bin_dir(&self) -> &'static str {
        match self {
            Platform::Unix => "bin",
            Platform::Windows => "Scripts",
        }
    }

    /// Executable file name for `name` on this platform.
    pub fn exe_name(&self, name: &str) -> String {
        match self {
            Platform::Unix => name.to_string(),
            Platform::Windows if name.to_lowercase().ends_with(".exe") => name.to_string(),
            Platform::Windows => format!("{}.exe", name),
        }
    }
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable. Does NOT use
/// the `which` command, whose behavior varies across systems.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    let file_name = Platform::current().exe_name(tool);
    for dir in path_entries {
        let candidate = dir.join(&file_name);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Check if running in a CI environment.
///
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Check if running as root/admin.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(windows)]
    {
        std::env::var("ADMIN").is_ok()
    }

    #[cfg(not(any(unix, windows)))]
    {
        false
    }
}

/// Ports below 1024 need elevated rights on Unix.
pub fn needs_privilege(port: u16) -> bool {
    Platform::current() == Platform::Unix && port < 1024
}
