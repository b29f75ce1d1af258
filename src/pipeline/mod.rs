//! The start-up pipeline.
//!
//! ```text
//! Bootstrap → ArtifactGate → PortGuard → Launch
//! ```
//!
//! Each stage is a hard precondition for the next. The first error ends
//! the run: the port is never queried after a gate failure and the server
//! is never started after a port conflict. The only soft spot is the
//! artifact gate in dev mode, which warns instead of aborting.
//!
//! All side effects go through [`Services`], so tests can drive the whole
//! chain against fakes.

pub mod stage;

pub use stage::{Stage, StageOutcome, StageStatus};

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::bootstrap::{BootstrapOptions, BootstrapOutcome, BootstrapPlan, Bootstrapper};
use crate::config::DepotConfig;
use crate::error::{DepotError, Result};
use crate::frontend::ArtifactGate;
use crate::launch::{LaunchPlan, Launcher, Mode, ServerSettings};
use crate::port::{ListenerProbe, PortGuard};
use crate::shell::{parse_system_path, CommandRunner};
use crate::ui::{format_duration, UserInterface};

/// The side-effecting collaborators of a run.
pub struct Services<'a> {
    pub runner: &'a dyn CommandRunner,
    pub probe: &'a dyn ListenerProbe,
    pub launcher: &'a dyn Launcher,
    /// Directories searched for the base interpreter.
    pub path_entries: Vec<PathBuf>,
}

impl<'a> Services<'a> {
    /// Services searching the real PATH.
    pub fn new(
        runner: &'a dyn CommandRunner,
        probe: &'a dyn ListenerProbe,
        launcher: &'a dyn Launcher,
    ) -> Self {
        Self {
            runner,
            probe,
            launcher,
            path_entries: parse_system_path(),
        }
    }

    pub fn with_path(mut self, path_entries: Vec<PathBuf>) -> Self {
        self.path_entries = path_entries;
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Create the venv if needed but do not run pip.
    pub skip_install: bool,
    /// Show the launch plan instead of starting the server.
    pub dry_run: bool,
    /// Delete and recreate the venv first.
    pub recreate: bool,
}

/// Result of a run that reached the launch stage.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub stages: Vec<StageOutcome>,
    pub plan: LaunchPlan,
    /// Server exit code. `None` for dry runs.
    pub exit_code: Option<i32>,
}

pub struct Pipeline<'c> {
    config: &'c DepotConfig,
    mode: Mode,
    root: PathBuf,
    options: PipelineOptions,
}

impl<'c> Pipeline<'c> {
    pub fn new(config: &'c DepotConfig, mode: Mode, root: &Path) -> Self {
        Self {
            config,
            mode,
            root: root.to_path_buf(),
            options: PipelineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Server settings this run would launch with.
    pub fn settings(&self) -> ServerSettings {
        ServerSettings::for_mode(self.config, self.mode, &self.root)
    }

    /// Launch plan this run would execute.
    pub fn launch_plan(&self) -> LaunchPlan {
        let venv = BootstrapPlan::from_config(self.config, &self.root).venv;
        LaunchPlan::uvicorn(&venv.python(), &self.config.backend.app, &self.settings())
    }

    /// Execute every stage in order, stopping at the first failure.
    pub fn run(&self, services: &Services, ui: &mut dyn UserInterface) -> Result<PipelineReport> {
        let mut stages = Vec::with_capacity(Stage::ALL.len());

        stages.push(self.timed(Stage::Bootstrap, ui, |p, ui| p.bootstrap(services, ui))?);
        stages.push(self.timed(Stage::ArtifactGate, ui, |p, ui| p.artifact_gate(ui))?);
        stages.push(self.timed(Stage::PortGuard, ui, |p, ui| p.port_guard(services, ui))?);

        let checked: Duration = stages.iter().map(|s| s.duration).sum();
        ui.success(&format!("Preconditions met in {}", format_duration(checked)));

        let plan = self.launch_plan();
        ui.show_stage(Stage::Launch.position(), Stage::ALL.len(), Stage::Launch.name());

        if self.options.dry_run {
            ui.output(&plan.render());
            stages.push(StageOutcome {
                stage: Stage::Launch,
                status: StageStatus::Skipped,
                duration: Default::default(),
            });
            return Ok(PipelineReport {
                stages,
                plan,
                exit_code: None,
            });
        }

        let settings = self.settings();
        ui.success(&format!(
            "Starting {} on http://{}:{} ({} mode)",
            self.config.display_name(),
            settings.host,
            settings.port,
            self.mode
        ));
        if ui.is_interactive() {
            ui.show_hint("Press Ctrl+C to stop the server.");
        }
        tracing::info!("Launching: {}", plan.to_spec());

        let started = Instant::now();
        let code = services.launcher.launch(&plan)?;
        stages.push(StageOutcome {
            stage: Stage::Launch,
            status: StageStatus::Passed,
            duration: started.elapsed(),
        });

        Ok(PipelineReport {
            stages,
            plan,
            exit_code: Some(code),
        })
    }

    fn timed<F>(&self, stage: Stage, ui: &mut dyn UserInterface, body: F) -> Result<StageOutcome>
    where
        F: FnOnce(&Self, &mut dyn UserInterface) -> Result<StageStatus>,
    {
        ui.show_stage(stage.position(), Stage::ALL.len(), stage.name());
        let started = Instant::now();
        let status = body(self, ui)?;
        tracing::debug!("{} finished in {:?}", stage, started.elapsed());
        Ok(StageOutcome {
            stage,
            status,
            duration: started.elapsed(),
        })
    }

    fn bootstrap(&self, services: &Services, ui: &mut dyn UserInterface) -> Result<StageStatus> {
        let plan = BootstrapPlan::from_config(self.config, &self.root);
        let bootstrapper = Bootstrapper::with_path(services.runner, services.path_entries.clone());
        let options = BootstrapOptions {
            recreate: self.options.recreate,
            skip_install: self.options.skip_install,
        };

        let mut spinner = ui.start_spinner("Preparing Python environment");
        match bootstrapper.ensure(&plan, options) {
            Ok(outcome) => {
                spinner.finish_success(&describe_bootstrap(&outcome));
                Ok(StageStatus::Passed)
            }
            Err(e) => {
                spinner.finish_error("Environment setup failed");
                Err(e)
            }
        }
    }

    fn artifact_gate(&self, ui: &mut dyn UserInterface) -> Result<StageStatus> {
        let gate = ArtifactGate::from_config(self.config, &self.root);
        let mut spinner = ui.start_spinner("Checking UI bundle");

        match gate.check() {
            Ok(report) => {
                spinner.finish_success(&format!("UI bundle references {}", report.marker));
                Ok(StageStatus::Passed)
            }
            Err(e @ (DepotError::ArtifactMissing { .. } | DepotError::ArtifactMisconfigured { .. }))
                if !self.mode.enforces_artifacts() =>
            {
                spinner.finish_skipped("UI bundle not usable, continuing in dev mode");
                ui.warning(&e.to_string());
                ui.show_hint("The API works without it. Run 'depot build' to serve the UI too.");
                Ok(StageStatus::Warned(e.to_string()))
            }
            Err(e) => {
                spinner.finish_error("UI bundle check failed");
                if !matches!(e, DepotError::Io(_)) {
                    ui.show_hint("Use 'depot dev' to start without a built bundle.");
                }
                Err(e)
            }
        }
    }

    fn port_guard(&self, services: &Services, ui: &mut dyn UserInterface) -> Result<StageStatus> {
        let port = self.config.server.port;
        let mut spinner = ui.start_spinner(&format!("Checking port {}", port));

        match PortGuard::new(services.probe).check(port) {
            Ok(()) => {
                spinner.finish_success(&format!("Port {} is free", port));
                Ok(StageStatus::Passed)
            }
            Err(e) => {
                spinner.finish_error(&format!("Port {} is taken", port));
                if matches!(e, DepotError::PortInUse { .. }) {
                    ui.show_hint("Stop the process holding it, or pick another port with DEPOT_PORT.");
                }
                Err(e)
            }
        }
    }
}

fn describe_bootstrap(outcome: &BootstrapOutcome) -> String {
    match (outcome.created, outcome.installed) {
        (true, true) => "Environment created and dependencies installed".to_string(),
        (false, true) => "Dependencies installed".to_string(),
        (true, false) => "Environment created (install skipped)".to_string(),
        (false, false) => "Environment ready (install skipped)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::Listener;
    use crate::shell::{CommandResult, CommandSpec, Platform};
    use crate::ui::{MockUI, SpinnerStatus};
    use std::cell::{Cell, RefCell};
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    struct FakeRunner {
        commands: RefCell<Vec<String>>,
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, spec: &CommandSpec) -> Result<CommandResult> {
            self.commands.borrow_mut().push(spec.to_string());
            Ok(CommandResult::success(
                String::new(),
                String::new(),
                Duration::ZERO,
            ))
        }
    }

    struct FakeProbe {
        listeners: Vec<Listener>,
        queried: Cell<bool>,
    }

    impl ListenerProbe for FakeProbe {
        fn listeners(&self, _port: u16) -> Result<Vec<Listener>> {
            self.queried.set(true);
            Ok(self.listeners.clone())
        }
    }

    struct FakeLauncher {
        launched: RefCell<Option<LaunchPlan>>,
    }

    impl Launcher for FakeLauncher {
        fn launch(&self, plan: &LaunchPlan) -> Result<i32> {
            *self.launched.borrow_mut() = Some(plan.clone());
            Ok(0)
        }
    }

    struct Fixture {
        temp: TempDir,
        runner: FakeRunner,
        probe: FakeProbe,
        launcher: FakeLauncher,
    }

    impl Fixture {
        /// A project with a ready venv and a correctly built bundle.
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let root = temp.path();
            let platform = Platform::current();

            let python = root
                .join("backend/.venv")
                .join(platform.venv_bin_dir())
                .join(platform.exe_name("python"));
            fs::create_dir_all(python.parent().unwrap()).unwrap();
            fs::write(&python, "").unwrap();
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&python, fs::Permissions::from_mode(0o755)).unwrap();
            }
            fs::write(root.join("backend/requirements.txt"), "fastapi\n").unwrap();

            fs::create_dir_all(root.join("frontend/dist")).unwrap();
            fs::write(
                root.join("frontend/dist/index.html"),
                r#"<script src="/ui/assets/index.js"></script>"#,
            )
            .unwrap();

            Self {
                temp,
                runner: FakeRunner {
                    commands: RefCell::new(Vec::new()),
                },
                probe: FakeProbe {
                    listeners: Vec::new(),
                    queried: Cell::new(false),
                },
                launcher: FakeLauncher {
                    launched: RefCell::new(None),
                },
            }
        }

        fn remove_bundle(&self) {
            fs::remove_file(self.temp.path().join("frontend/dist/index.html")).unwrap();
        }

        fn occupy_port(&mut self, pid: u32) {
            self.probe.listeners = vec![Listener {
                pid: Some(pid),
                command: Some("python".to_string()),
            }];
        }

        fn run(&self, mode: Mode, options: PipelineOptions, ui: &mut MockUI) -> Result<PipelineReport> {
            let config = DepotConfig::default();
            let services =
                Services::new(&self.runner, &self.probe, &self.launcher).with_path(Vec::new());
            Pipeline::new(&config, mode, self.temp.path())
                .with_options(options)
                .run(&services, ui)
        }
    }

    #[test]
    fn prod_run_launches_after_all_guards() {
        let fixture = Fixture::new();
        let mut ui = MockUI::new();

        let report = fixture
            .run(Mode::Prod, PipelineOptions::default(), &mut ui)
            .unwrap();

        assert_eq!(report.exit_code, Some(0));
        assert_eq!(ui.stages(), &["Bootstrap", "Artifact gate", "Port guard", "Launch"]);
        assert!(ui.successes().iter().any(|s| s.starts_with("Preconditions met in ")));
        // MockUI is not interactive
        assert!(!ui.has_hint("Ctrl+C"));
        assert!(fixture.probe.queried.get());

        let launched = fixture.launcher.launched.borrow().clone().unwrap();
        assert_eq!(launched.env.get("HOST").map(String::as_str), Some("0.0.0.0"));
        assert!(!launched.args.iter().any(|a| a == "--reload"));
        // Existing venv: pip upgrade + install only
        assert_eq!(fixture.runner.commands.borrow().len(), 2);
    }

    #[test]
    fn missing_bundle_in_prod_stops_before_port_check() {
        let fixture = Fixture::new();
        fixture.remove_bundle();
        let mut ui = MockUI::new();

        let err = fixture
            .run(Mode::Prod, PipelineOptions::default(), &mut ui)
            .unwrap_err();

        assert!(matches!(err, DepotError::ArtifactMissing { .. }));
        assert!(!fixture.probe.queried.get());
        assert!(fixture.launcher.launched.borrow().is_none());
        assert_eq!(ui.stages(), &["Bootstrap", "Artifact gate"]);
        assert!(ui.has_hint("depot dev"));
    }

    #[test]
    fn missing_bundle_in_dev_only_warns() {
        let fixture = Fixture::new();
        fixture.remove_bundle();
        let mut ui = MockUI::new();

        let report = fixture
            .run(Mode::Dev, PipelineOptions::default(), &mut ui)
            .unwrap();

        assert!(matches!(report.stages[1].status, StageStatus::Warned(_)));
        assert!(ui.has_warning("UI bundle not found"));
        assert!(ui.has_hint("depot build"));
        let launched = fixture.launcher.launched.borrow().clone().unwrap();
        assert_eq!(launched.env.get("HOST").map(String::as_str), Some("127.0.0.1"));
        assert_eq!(launched.args.last().map(String::as_str), Some("--reload"));
    }

    #[test]
    fn non_utf8_index_passes_in_both_modes() {
        let fixture = Fixture::new();
        let mut index = br#"<script src="/ui/assets/index.js"></script><!-- "#.to_vec();
        index.extend_from_slice(&[0xFF, b' ', b'-', b'-', b'>']);
        fs::write(fixture.temp.path().join("frontend/dist/index.html"), &index).unwrap();

        for mode in [Mode::Dev, Mode::Prod] {
            let mut ui = MockUI::new();
            let report = fixture.run(mode, PipelineOptions::default(), &mut ui).unwrap();
            assert_eq!(report.stages[1].status, StageStatus::Passed, "{} mode", mode);
        }
    }

    #[test]
    fn non_utf8_index_without_marker_only_warns_in_dev() {
        let fixture = Fixture::new();
        fs::write(
            fixture.temp.path().join("frontend/dist/index.html"),
            [b'<', b'p', b'>', 0xFF, 0xFE],
        )
        .unwrap();

        let mut ui = MockUI::new();
        let report = fixture.run(Mode::Dev, PipelineOptions::default(), &mut ui).unwrap();
        assert!(matches!(report.stages[1].status, StageStatus::Warned(_)));

        let mut ui = MockUI::new();
        let err = fixture
            .run(Mode::Prod, PipelineOptions::default(), &mut ui)
            .unwrap_err();
        assert!(matches!(err, DepotError::ArtifactMisconfigured { .. }));
    }

    #[test]
    fn port_conflict_never_launches() {
        let mut fixture = Fixture::new();
        fixture.occupy_port(4242);
        let mut ui = MockUI::new();

        let err = fixture
            .run(Mode::Prod, PipelineOptions::default(), &mut ui)
            .unwrap_err();

        assert_eq!(err.to_string(), "Port 8008 is already in use by PID 4242");
        assert!(ui.has_hint("DEPOT_PORT"));
        assert!(fixture.launcher.launched.borrow().is_none());
        assert!(ui
            .spinner_outcomes()
            .contains(&(SpinnerStatus::Error, "Port 8008 is taken".to_string())));
    }

    #[test]
    fn bootstrap_failure_stops_everything() {
        let fixture = Fixture::new();
        fs::remove_file(fixture.temp.path().join("backend/requirements.txt")).unwrap();
        let mut ui = MockUI::new();

        let err = fixture
            .run(Mode::Prod, PipelineOptions::default(), &mut ui)
            .unwrap_err();

        assert!(matches!(err, DepotError::MissingPrerequisite { .. }));
        assert!(!fixture.probe.queried.get());
        assert!(fixture.launcher.launched.borrow().is_none());
        assert_eq!(ui.stages(), &["Bootstrap"]);
    }

    #[test]
    fn dry_run_renders_plan_without_launching() {
        let fixture = Fixture::new();
        let mut ui = MockUI::new();

        let report = fixture
            .run(
                Mode::Prod,
                PipelineOptions {
                    dry_run: true,
                    ..Default::default()
                },
                &mut ui,
            )
            .unwrap();

        assert_eq!(report.exit_code, None);
        assert_eq!(report.stages[3].status, StageStatus::Skipped);
        assert!(ui.has_output("-m uvicorn main:app"));
        assert!(fixture.launcher.launched.borrow().is_none());
    }

    #[test]
    fn skip_install_runs_no_pip() {
        let fixture = Fixture::new();
        let mut ui = MockUI::new();

        fixture
            .run(
                Mode::Prod,
                PipelineOptions {
                    skip_install: true,
                    ..Default::default()
                },
                &mut ui,
            )
            .unwrap();

        assert!(fixture.runner.commands.borrow().is_empty());
        assert!(ui.spinner_outcomes().contains(&(
            SpinnerStatus::Success,
            "Environment ready (install skipped)".to_string()
        )));
    }
}
