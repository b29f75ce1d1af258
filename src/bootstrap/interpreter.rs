//! Locating the base Python interpreter used to create the venv.

use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::{DepotError, Result};
use crate::shell::{resolve_tool_path, CommandRunner, CommandSpec};

static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Python\s+(\d+)\.(\d+)(?:\.(\d+))?").unwrap());

/// A parsed `python --version` result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl PythonVersion {
    /// Extract a version from `--version` output (stdout or stderr).
    pub fn parse(output: &str) -> Option<Self> {
        let caps = VERSION_REGEX.captures(output)?;
        Some(Self {
            major: caps.get(1)?.as_str().parse().ok()?,
            minor: caps.get(2)?.as_str().parse().ok()?,
            patch: caps
                .get(3)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0),
        })
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A Python interpreter found on the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    /// Absolute path to the executable.
    pub path: PathBuf,
    /// Reported version, if `--version` could be parsed.
    pub version: Option<PythonVersion>,
}

impl Interpreter {
    /// Find the first candidate on PATH and ask it for its version.
    pub fn detect(
        candidates: &[String],
        path_entries: &[PathBuf],
        runner: &dyn CommandRunner,
    ) -> Result<Self> {
        let path = find_interpreter(candidates, path_entries)?;
        let version = query_version(&path, runner);
        match &version {
            Some(v) => tracing::info!("Using Python {} at {}", v, path.display()),
            None => tracing::info!("Using Python at {}", path.display()),
        }
        Ok(Self { path, version })
    }

    /// Command that creates a virtual environment at `target`.
    pub fn venv_command(&self, target: &Path) -> CommandSpec {
        CommandSpec::new(&self.path)
            .args(["-m", "venv"])
            .arg(target)
    }
}

/// Return the first configured interpreter name found on PATH.
pub fn find_interpreter(candidates: &[String], path_entries: &[PathBuf]) -> Result<PathBuf> {
    for name in candidates.iter().filter(|c| !c.trim().is_empty()) {
        if let Some(path) = resolve_tool_path(name.trim(), path_entries) {
            return Ok(path);
        }
        tracing::debug!("Interpreter candidate '{}' not on PATH", name);
    }

    Err(DepotError::MissingPrerequisite {
        what: "python".to_string(),
        message: format!(
            "none of [{}] found on PATH. Install Python 3 and rerun.",
            candidates.join(", ")
        ),
    })
}

fn query_version(path: &Path, runner: &dyn CommandRunner) -> Option<PythonVersion> {
    let spec = CommandSpec::new(path).arg("--version");
    let result = runner.run(&spec).ok()?;
    // Python 2 printed its version on stderr
    PythonVersion::parse(&result.stdout).or_else(|| PythonVersion::parse(&result.stderr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_version() {
        let v = PythonVersion::parse("Python 3.11.4\n").unwrap();
        assert_eq!(
            v,
            PythonVersion {
                major: 3,
                minor: 11,
                patch: 4
            }
        );
        assert_eq!(v.to_string(), "3.11.4");
    }

    #[test]
    fn parses_version_without_patch() {
        let v = PythonVersion::parse("Python 3.13").unwrap();
        assert_eq!(v.minor, 13);
        assert_eq!(v.patch, 0);
    }

    #[test]
    fn rejects_unrelated_output() {
        assert!(PythonVersion::parse("command not found").is_none());
    }

    #[test]
    fn versions_order_numerically() {
        let older = PythonVersion::parse("Python 3.9.18").unwrap();
        let newer = PythonVersion::parse("Python 3.10.0").unwrap();
        assert!(older < newer);
    }

    #[test]
    fn missing_interpreter_lists_candidates() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = find_interpreter(
            &["python3".to_string(), "python".to_string()],
            &[temp.path().to_path_buf()],
        )
        .unwrap_err();

        assert!(matches!(err, DepotError::MissingPrerequisite { .. }));
        assert!(err.to_string().contains("python3, python"));
    }

    #[test]
    fn venv_command_targets_directory() {
        let interpreter = Interpreter {
            path: PathBuf::from("/usr/bin/python3"),
            version: None,
        };
        let spec = interpreter.venv_command(Path::new("/srv/backend/.venv"));
        assert_eq!(spec.to_string(), "/usr/bin/python3 -m venv /srv/backend/.venv");
    }
}
