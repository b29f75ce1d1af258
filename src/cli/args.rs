//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::launch::Mode;

/// depot - bootstrap, verify and launch the asset manager backend.
#[derive(Debug, Parser)]
#[command(name = "depot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to project root (overrides discovery from the current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output, including installer output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// No output except errors; the exit code tells the outcome
    #[arg(long, global = true, conflicts_with_all = ["verbose", "quiet"])]
    pub silent: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Bootstrap, then start the server on loopback with auto-reload
    Dev(LaunchArgs),

    /// Bootstrap, verify the UI bundle and port, then start the server
    Start(LaunchArgs),

    /// Create the Python environment and install dependencies
    Bootstrap(BootstrapArgs),

    /// Build the UI bundle with the configured base path
    Build,

    /// Run the launch preconditions without starting anything
    Check(CheckArgs),

    /// Probe the running server's /health endpoint
    Health(HealthArgs),

    /// Write a .depot/config.yml with the default settings
    Init(InitArgs),

    /// Show resolved configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

impl Commands {
    /// The launch mode a command runs in, if it launches.
    pub fn mode(&self) -> Option<Mode> {
        match self {
            Commands::Dev(_) => Some(Mode::Dev),
            Commands::Start(_) => Some(Mode::Prod),
            _ => None,
        }
    }
}

/// Arguments for `dev` and `start`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct LaunchArgs {
    /// Print the server command instead of starting it
    #[arg(long)]
    pub dry_run: bool,

    /// Reuse the environment as-is without running pip
    #[arg(long)]
    pub skip_install: bool,

    /// Delete and recreate the Python environment first
    #[arg(long)]
    pub recreate: bool,
}

/// Arguments for the `bootstrap` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct BootstrapArgs {
    /// Delete and recreate the Python environment
    #[arg(long)]
    pub recreate: bool,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CheckArgs {
    /// Mode whose rules apply (dev only warns about the UI bundle)
    #[arg(long, value_enum, default_value_t = Mode::Prod)]
    pub mode: Mode,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl Default for CheckArgs {
    fn default() -> Self {
        Self {
            mode: Mode::Prod,
            json: false,
        }
    }
}

/// Arguments for the `health` command.
#[derive(Debug, Clone, clap::Args)]
pub struct HealthArgs {
    /// Mode whose bind host is probed
    #[arg(long, value_enum, default_value_t = Mode::Prod)]
    pub mode: Mode,

    /// Probe this host instead of the configured one
    #[arg(long)]
    pub host: Option<String>,

    /// Probe this port instead of the configured one
    #[arg(long)]
    pub port: Option<u16>,

    /// Seconds to wait for an answer
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl Default for HealthArgs {
    fn default() -> Self {
        Self {
            mode: Mode::Prod,
            host: None,
            port: None,
            timeout: 5,
            json: false,
        }
    }
}

/// Arguments for the `init` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InitArgs {
    /// Overwrite an existing configuration
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long, conflicts_with = "schema")]
    pub json: bool,

    /// Print the JSON schema of the config file instead
    #[arg(long)]
    pub schema: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_start_with_flags() {
        let cli = Cli::try_parse_from(["depot", "start", "--dry-run", "--skip-install"]).unwrap();
        match cli.command {
            Commands::Start(args) => {
                assert!(args.dry_run);
                assert!(args.skip_install);
                assert!(!args.recreate);
            }
            other => panic!("Expected start, got {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["depot", "dev", "--project", "/srv/app", "--debug"]).unwrap();
        assert_eq!(cli.project, Some(PathBuf::from("/srv/app")));
        assert!(cli.debug);
        assert_eq!(cli.command.mode(), Some(Mode::Dev));
    }

    #[test]
    fn check_mode_defaults_to_prod() {
        let cli = Cli::try_parse_from(["depot", "check"]).unwrap();
        match cli.command {
            Commands::Check(args) => assert_eq!(args.mode, Mode::Prod),
            other => panic!("Expected check, got {:?}", other),
        }
        let cli = Cli::try_parse_from(["depot", "check", "--mode", "dev", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Check(CheckArgs { mode: Mode::Dev, json: true })));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["depot"]).is_err());
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["depot", "-v", "-q", "check"]).is_err());
    }

    #[test]
    fn silent_conflicts_with_other_levels() {
        assert!(Cli::try_parse_from(["depot", "--silent", "check"]).unwrap().silent);
        assert!(Cli::try_parse_from(["depot", "--silent", "-q", "check"]).is_err());
        assert!(Cli::try_parse_from(["depot", "--silent", "-v", "check"]).is_err());
    }

    #[test]
    fn config_json_conflicts_with_schema() {
        assert!(Cli::try_parse_from(["depot", "config", "--json", "--schema"]).is_err());
    }
}
