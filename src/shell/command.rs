//! External command execution.
//!
//! Commands are spawned directly (program + argv), never through a shell,
//! so interpreter and venv paths containing spaces need no quoting.

use crate::error::{DepotError, Result};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// A command to run: program, arguments, working directory and extra env.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path.
    pub program: OsString,

    /// Arguments passed verbatim.
    pub args: Vec<OsString>,

    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables added to the inherited environment.
    pub env: BTreeMap<String, String>,
}

impl CommandSpec {
    /// Create a spec for `program` with no arguments.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: BTreeMap::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Add an environment variable for the child only.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Program name for diagnostics (file name only).
    pub fn program_name(&self) -> String {
        Path::new(&self.program)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.to_string_lossy().into_owned())
    }

    /// Build a `std::process::Command` from this spec.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.contains(' ') {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output (empty unless captured).
    pub stdout: String,

    /// Standard error (empty unless captured).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Last `n` non-empty lines of stderr, falling back to stdout.
    pub fn tail(&self, n: usize) -> String {
        let source = if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        };
        let lines: Vec<&str> = source.lines().filter(|l| !l.trim().is_empty()).collect();
        let start = lines.len().saturating_sub(n);
        lines[start..].join("\n")
    }
}

/// Execute a command, capturing or inheriting its output.
///
/// A program that cannot be found is reported as a missing prerequisite;
/// any other spawn failure as a failed command.
pub fn execute(spec: &CommandSpec, capture: bool) -> Result<CommandResult> {
    let start = Instant::now();
    let mut cmd = spec.to_command();

    if capture {
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
    }
    cmd.stdin(Stdio::null());

    tracing::debug!("Executing: {}", spec);

    let output = cmd.output().map_err(|e| spawn_error(spec, e))?;
    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        tracing::debug!("{} exited with {:?}", spec.program_name(), output.status.code());
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

/// Turn a failed spawn or exec into the matching depot error.
///
/// A missing working directory also surfaces as `NotFound`, so it is
/// checked first.
pub fn spawn_error(spec: &CommandSpec, err: std::io::Error) -> DepotError {
    if let Some(cwd) = spec.cwd.as_deref().filter(|cwd| !cwd.is_dir()) {
        return DepotError::MissingPrerequisite {
            what: "working directory".to_string(),
            message: format!("{} does not exist (needed by {})", cwd.display(), spec),
        };
    }

    if err.kind() == std::io::ErrorKind::NotFound {
        let program = Path::new(&spec.program);
        let message = if program.components().count() > 1 {
            format!("'{}' does not exist", program.display())
        } else {
            format!("'{}' was not found on PATH", program.display())
        };
        DepotError::MissingPrerequisite {
            what: spec.program_name(),
            message,
        }
    } else {
        DepotError::CommandFailed {
            command: spec.to_string(),
            message: err.to_string(),
        }
    }
}

/// Runs commands on behalf of the pipeline.
///
/// The pipeline never spawns processes directly so tests can record
/// the commands it would have run.
pub trait CommandRunner {
    /// Run a command to completion.
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult>;
}

/// Runs commands on the real system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner {
    inherit_output: bool,
}

impl SystemRunner {
    /// Capture output; it is shown only when a command fails.
    pub fn capturing() -> Self {
        Self {
            inherit_output: false,
        }
    }

    /// Let child output go straight to the terminal.
    pub fn inheriting() -> Self {
        Self {
            inherit_output: true,
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult> {
        execute(spec, !self.inherit_output)
    }
}
