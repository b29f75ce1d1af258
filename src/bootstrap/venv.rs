//! The backend's isolated dependency environment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::shell::{is_executable, CommandSpec, Platform};

/// State of a virtual environment directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenvState {
    /// Directory does not exist.
    Missing,
    /// Directory exists and has a usable interpreter.
    Ready,
    /// Directory exists but the interpreter is gone.
    Broken,
}

/// Handle to a virtual environment directory.
///
/// Created once, then reused by every later run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEnv {
    root: PathBuf,
    platform: Platform,
}

impl VirtualEnv {
    /// Handle for a venv at `root` on the current platform.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_platform(root, Platform::current())
    }

    /// Handle for a venv with an explicit layout.
    pub fn with_platform(root: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            root: root.into(),
            platform,
        }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the venv's interpreter.
    pub fn python(&self) -> PathBuf {
        self.root
            .join(self.platform.venv_bin_dir())
            .join(self.platform.exe_name("python"))
    }

    /// Inspect the directory.
    pub fn state(&self) -> VenvState {
        if !self.root.exists() {
            return VenvState::Missing;
        }
        let python = self.python();
        if python.is_file() && is_executable(&python) {
            VenvState::Ready
        } else {
            VenvState::Broken
        }
    }

    /// `python -m <module> <args..>` using the venv interpreter.
    pub fn module_command<I, S>(&self, module: &str, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<std::ffi::OsString>,
    {
        CommandSpec::new(self.python())
            .args(["-m", module])
            .args(args)
    }

    /// Command that upgrades the package installer.
    pub fn pip_upgrade_command(&self) -> CommandSpec {
        self.module_command("pip", ["install", "--upgrade", "pip"])
    }

    /// Command that installs the manifest's dependency set.
    pub fn pip_install_command(&self, requirements: &Path) -> CommandSpec {
        self.module_command("pip", ["install", "-r"])
            .arg(requirements)
    }

    /// Delete the directory so it can be created again.
    pub fn remove(&self) -> Result<()> {
        if self.root.exists() {
            tracing::info!("Removing virtual environment at {}", self.root.display());
            fs::remove_dir_all(&self.root)?;
        }
        Ok(())
    }
}
