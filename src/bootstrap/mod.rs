//! Environment bootstrapping.
//!
//! Ensures the backend's isolated Python environment exists and holds the
//! dependency set declared in its manifest:
//!
//! 1. find a base interpreter on PATH (only needed when creating)
//! 2. create the venv if the directory is missing
//! 3. upgrade pip inside the venv
//! 4. install the manifest
//!
//! Every failure is fatal. Nothing is retried; the operator fixes the cause
//! and reruns.
//!
//! # Modules
//!
//! - [`interpreter`] - Base interpreter discovery and version parsing
//! - [`venv`] - Virtual environment handle and layout
//! - [`stamp`] - Record of the last successful install

pub mod interpreter;
pub mod stamp;
pub mod venv;

pub use interpreter::{find_interpreter, Interpreter, PythonVersion};
pub use stamp::InstallStamp;
pub use venv::{VenvState, VirtualEnv};

use std::path::{Path, PathBuf};

use crate::config::DepotConfig;
use crate::error::{DepotError, Result};
use crate::shell::{parse_system_path, CommandRunner, CommandSpec};

/// Where the environment lives and what goes into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapPlan {
    /// The environment handle.
    pub venv: VirtualEnv,
    /// Dependency manifest.
    pub requirements: PathBuf,
    /// Interpreter names to search for when creating the venv.
    pub interpreters: Vec<String>,
}

impl BootstrapPlan {
    /// Resolve the plan for a project.
    pub fn from_config(config: &DepotConfig, project_root: &Path) -> Self {
        let backend = project_root.join(&config.backend.dir);
        Self {
            venv: VirtualEnv::new(backend.join(&config.backend.venv_dir)),
            requirements: backend.join(&config.backend.requirements),
            interpreters: config.backend.interpreters.clone(),
        }
    }
}

/// Knobs for a bootstrap run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BootstrapOptions {
    /// Delete and recreate an existing environment.
    pub recreate: bool,
    /// Only make sure the environment exists; do not touch pip.
    pub skip_install: bool,
}

/// What a bootstrap run did.
#[derive(Debug, Clone)]
pub struct BootstrapOutcome {
    /// Whether the environment was created by this run.
    pub created: bool,
    /// Whether dependencies were installed by this run.
    pub installed: bool,
    /// Base interpreter used for creation, if creation happened.
    pub interpreter: Option<Interpreter>,
}

/// Creates and populates virtual environments.
pub struct Bootstrapper<'a> {
    runner: &'a dyn CommandRunner,
    path_entries: Vec<PathBuf>,
}

impl<'a> Bootstrapper<'a> {
    /// Bootstrapper searching the real PATH.
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self::with_path(runner, parse_system_path())
    }

    /// Bootstrapper searching the given directories.
    pub fn with_path(runner: &'a dyn CommandRunner, path_entries: Vec<PathBuf>) -> Self {
        Self {
            runner,
            path_entries,
        }
    }

    /// Ensure the environment exists, then install the manifest into it.
    pub fn ensure(&self, plan: &BootstrapPlan, options: BootstrapOptions) -> Result<BootstrapOutcome> {
        // Fail before touching the venv if there is nothing to install
        if !options.skip_install && !plan.requirements.is_file() {
            return Err(DepotError::MissingPrerequisite {
                what: "requirements".to_string(),
                message: format!("no dependency manifest at {}", plan.requirements.display()),
            });
        }

        if options.recreate {
            plan.venv.remove()?;
        }

        let mut interpreter = None;
        let created = match plan.venv.state() {
            VenvState::Ready => {
                tracing::info!("Reusing virtual environment at {}", plan.venv.root().display());
                false
            }
            VenvState::Missing => {
                interpreter = Some(self.create(plan)?);
                true
            }
            VenvState::Broken => {
                return Err(DepotError::InstallFailed {
                    stage: "environment check".to_string(),
                    message: format!(
                        "{} exists but has no interpreter at {}. Rerun with --recreate.",
                        plan.venv.root().display(),
                        plan.venv.python().display()
                    ),
                });
            }
        };

        if options.skip_install {
            return Ok(BootstrapOutcome {
                created,
                installed: false,
                interpreter,
            });
        }

        self.install(plan)?;

        Ok(BootstrapOutcome {
            created,
            installed: true,
            interpreter,
        })
    }

    fn create(&self, plan: &BootstrapPlan) -> Result<Interpreter> {
        let interpreter = Interpreter::detect(&plan.interpreters, &self.path_entries, self.runner)?;

        tracing::info!("Creating virtual environment at {}", plan.venv.root().display());
        run_checked(
            self.runner,
            &interpreter.venv_command(plan.venv.root()),
            "environment creation",
        )?;

        if plan.venv.state() != VenvState::Ready {
            return Err(DepotError::InstallFailed {
                stage: "environment creation".to_string(),
                message: format!(
                    "venv reported success but {} is missing",
                    plan.venv.python().display()
                ),
            });
        }

        Ok(interpreter)
    }

    fn install(&self, plan: &BootstrapPlan) -> Result<()> {
        tracing::info!("Upgrading pip");
        run_checked(self.runner, &plan.venv.pip_upgrade_command(), "pip upgrade")?;

        tracing::info!("Installing {}", plan.requirements.display());
        run_checked(
            self.runner,
            &plan.venv.pip_install_command(&plan.requirements),
            "dependency install",
        )?;

        InstallStamp::for_manifest(&plan.requirements)?.save(plan.venv.root())?;
        Ok(())
    }
}

/// Run a command, turning a non-zero exit into `InstallFailed`.
pub fn run_checked(runner: &dyn CommandRunner, spec: &CommandSpec, stage: &str) -> Result<()> {
    let result = runner.run(spec)?;
    if result.success {
        return Ok(());
    }

    let code = result
        .exit_code
        .map(|c| c.to_string())
        .unwrap_or_else(|| "signal".to_string());
    let tail = result.tail(5);
    let message = if tail.is_empty() {
        format!("`{}` exited with {}", spec, code)
    } else {
        format!("`{}` exited with {}:\n{}", spec, code, tail)
    };

    Err(DepotError::InstallFailed {
        stage: stage.to_string(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::CommandResult;
    use std::cell::RefCell;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Records commands; `-m venv` materialises a fake interpreter.
    struct FakeRunner {
        commands: RefCell<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl FakeRunner {
        fn new() -> Self {
            Self {
                commands: RefCell::new(Vec::new()),
                fail_on: None,
            }
        }

        fn failing_on(needle: &'static str) -> Self {
            Self {
                commands: RefCell::new(Vec::new()),
                fail_on: Some(needle),
            }
        }

        fn commands(&self) -> Vec<String> {
            self.commands.borrow().clone()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, spec: &CommandSpec) -> Result<CommandResult> {
            let line = spec.to_string();
            self.commands.borrow_mut().push(line.clone());

            if self.fail_on.is_some_and(|needle| line.contains(needle)) {
                return Ok(CommandResult::failure(
                    Some(1),
                    String::new(),
                    "ERROR: boom\n".to_string(),
                    Duration::ZERO,
                ));
            }

            if spec.args.first().is_some_and(|a| a == "-m")
                && spec.args.get(1).is_some_and(|a| a == "venv")
            {
                let target = PathBuf::from(spec.args.last().unwrap());
                make_executable(&VirtualEnv::new(target).python());
            }

            let stdout = if line.ends_with("--version") {
                "Python 3.12.1\n".to_string()
            } else {
                String::new()
            };
            Ok(CommandResult::success(stdout, String::new(), Duration::ZERO))
        }
    }

    fn make_executable(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    struct Project {
        temp: TempDir,
        bin: PathBuf,
    }

    fn project() -> Project {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        make_executable(&bin.join(crate::shell::Platform::current().exe_name("python3")));
        let backend = temp.path().join("backend");
        fs::create_dir_all(&backend).unwrap();
        fs::write(backend.join("requirements.txt"), "fastapi\nuvicorn\n").unwrap();
        Project { temp, bin }
    }

    fn plan(project: &Project) -> BootstrapPlan {
        BootstrapPlan::from_config(&DepotConfig::default(), project.temp.path())
    }

    #[test]
    fn plan_resolves_paths_under_backend() {
        let plan = BootstrapPlan::from_config(&DepotConfig::default(), Path::new("/srv/app"));
        assert_eq!(plan.venv.root(), Path::new("/srv/app/backend/.venv"));
        assert_eq!(plan.requirements, PathBuf::from("/srv/app/backend/requirements.txt"));
    }

    #[test]
    fn missing_environment_is_created_then_installed() {
        let project = project();
        let plan = plan(&project);
        let runner = FakeRunner::new();
        let bootstrapper = Bootstrapper::with_path(&runner, vec![project.bin.clone()]);

        let outcome = bootstrapper.ensure(&plan, BootstrapOptions::default()).unwrap();

        assert!(outcome.created);
        assert!(outcome.installed);
        assert_eq!(
            outcome.interpreter.unwrap().version.unwrap().to_string(),
            "3.12.1"
        );
        assert_eq!(plan.venv.state(), VenvState::Ready);

        let commands = runner.commands();
        assert_eq!(commands.len(), 4);
        assert!(commands[1].contains("-m venv"));
        assert!(commands[2].ends_with("-m pip install --upgrade pip"));
        assert!(commands[3].contains("-m pip install -r"));
        assert!(InstallStamp::load(plan.venv.root()).is_some());
    }

    #[test]
    fn existing_environment_is_not_recreated() {
        let project = project();
        let plan = plan(&project);
        make_executable(&plan.venv.python());
        let runner = FakeRunner::new();
        // Empty PATH: creation would fail if attempted
        let bootstrapper = Bootstrapper::with_path(&runner, Vec::new());

        let outcome = bootstrapper.ensure(&plan, BootstrapOptions::default()).unwrap();

        assert!(!outcome.created);
        assert!(outcome.installed);
        let commands = runner.commands();
        assert_eq!(commands.len(), 2);
        assert!(commands.iter().all(|c| !c.contains("-m venv")));
    }

    #[test]
    fn broken_environment_requires_recreate() {
        let project = project();
        let plan = plan(&project);
        fs::create_dir_all(plan.venv.root()).unwrap();
        let runner = FakeRunner::new();
        let bootstrapper = Bootstrapper::with_path(&runner, vec![project.bin.clone()]);

        let err = bootstrapper
            .ensure(&plan, BootstrapOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("--recreate"));
        assert!(runner.commands().is_empty());

        let outcome = bootstrapper
            .ensure(
                &plan,
                BootstrapOptions {
                    recreate: true,
                    skip_install: false,
                },
            )
            .unwrap();
        assert!(outcome.created);
    }

    #[test]
    fn missing_interpreter_is_fatal() {
        let project = project();
        let plan = plan(&project);
        let runner = FakeRunner::new();
        let bootstrapper = Bootstrapper::with_path(&runner, Vec::new());

        let err = bootstrapper
            .ensure(&plan, BootstrapOptions::default())
            .unwrap_err();
        assert!(matches!(err, DepotError::MissingPrerequisite { .. }));
        assert_eq!(plan.venv.state(), VenvState::Missing);
    }

    #[test]
    fn failed_install_stops_without_stamp() {
        let project = project();
        let plan = plan(&project);
        let runner = FakeRunner::failing_on("-r");
        let bootstrapper = Bootstrapper::with_path(&runner, vec![project.bin.clone()]);

        let err = bootstrapper
            .ensure(&plan, BootstrapOptions::default())
            .unwrap_err();

        match err {
            DepotError::InstallFailed { stage, message } => {
                assert_eq!(stage, "dependency install");
                assert!(message.contains("ERROR: boom"));
            }
            other => panic!("Expected InstallFailed, got {:?}", other),
        }
        assert!(InstallStamp::load(plan.venv.root()).is_none());
    }

    #[test]
    fn failed_creation_is_install_failure() {
        let project = project();
        let plan = plan(&project);
        let runner = FakeRunner::failing_on("-m venv");
        let bootstrapper = Bootstrapper::with_path(&runner, vec![project.bin.clone()]);

        let err = bootstrapper
            .ensure(&plan, BootstrapOptions::default())
            .unwrap_err();
        assert!(matches!(err, DepotError::InstallFailed { ref stage, .. } if stage == "environment creation"));
    }

    #[test]
    fn missing_manifest_is_missing_prerequisite() {
        let project = project();
        let plan = plan(&project);
        fs::remove_file(&plan.requirements).unwrap();
        let runner = FakeRunner::new();
        let bootstrapper = Bootstrapper::with_path(&runner, vec![project.bin.clone()]);

        let err = bootstrapper
            .ensure(&plan, BootstrapOptions::default())
            .unwrap_err();
        assert!(matches!(err, DepotError::MissingPrerequisite { ref what, .. } if what == "requirements"));
        assert!(runner.commands().is_empty());
        assert_eq!(plan.venv.state(), VenvState::Missing);
    }

    #[test]
    fn skip_install_only_creates() {
        let project = project();
        let plan = plan(&project);
        let runner = FakeRunner::new();
        let bootstrapper = Bootstrapper::with_path(&runner, vec![project.bin.clone()]);

        let outcome = bootstrapper
            .ensure(
                &plan,
                BootstrapOptions {
                    recreate: false,
                    skip_install: true,
                },
            )
            .unwrap();

        assert!(outcome.created);
        assert!(!outcome.installed);
        assert!(runner.commands().iter().all(|c| !c.contains("pip")));
    }
}
