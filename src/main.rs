//! depot CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use depot::cli::{Cli, CommandDispatcher};
use depot::config::find_project_root;
use depot::shell::is_ci;
use depot::ui::{create_ui, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// `--debug` wins over `RUST_LOG`; the default is INFO.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("depot=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("depot=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("depot starting with args: {:?}", cli);

    let output_mode = if cli.silent {
        OutputMode::Silent
    } else if cli.quiet {
        OutputMode::Quiet
    } else if cli.verbose {
        OutputMode::Verbose
    } else {
        OutputMode::Normal
    };

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let project_root = match &cli.project {
        Some(path) => path.clone(),
        None => {
            let cwd = std::env::current_dir().unwrap_or_default();
            find_project_root(&cwd).unwrap_or(cwd)
        }
    };

    let mut ui = create_ui(!is_ci(), output_mode);
    let dispatcher = CommandDispatcher::new(project_root);

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.process_exit_code()),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
