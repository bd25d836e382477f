/// Subcommand handlers
pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::env;
use std::path::PathBuf;
use std::process::exit;
use tracing_subscriber::EnvFilter;

use crate::domain::entities::workspace::{DEFAULT_REPOS_ROOT, DEFAULT_REPO_LIST_FILE};
use commands::{ListCommand, RunOptions, StatusCommand, SyncCommand};

/// Output format options for status command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table (default)
    Text,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    " ",
    env!("BUILD_DATE"),
    ")"
);

/// manage-repos - Keep a set of sibling git working copies in sync with a managed list
#[derive(Debug, Parser)]
#[command(name = "manage-repos")]
#[command(about = "Clone, fetch and report on the git working copies next to this one")]
#[command(version, long_version = LONG_VERSION)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output and progress bars
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Working directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Managed repository list (`local_dir,repo_url` per line)
    #[arg(long, global = true, env = "MANAGE_REPOS_CONFIG", default_value = DEFAULT_REPO_LIST_FILE)]
    pub config: PathBuf,

    /// Directory holding the working copies
    #[arg(long, global = true, env = "MANAGE_REPOS_ROOT", default_value = DEFAULT_REPOS_ROOT)]
    pub root: PathBuf,

    /// Number of parallel jobs (0 = number of CPUs)
    #[arg(short, long, global = true, default_value_t = 1)]
    pub jobs: usize,

    /// Continue a clone or fetch pass after a failing entry
    #[arg(long, global = true)]
    pub keep_going: bool,

    /// Do not clone missing managed repositories
    #[arg(long, global = true)]
    pub no_clone: bool,

    /// Do not contact remotes (no fetch, compare against existing tracking refs)
    #[arg(long, global = true)]
    pub offline: bool,

    /// Output format (text, json, yaml)
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand (defaults to `status`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clone missing repositories, fetch remotes and show the status table (default)
    Status {
        /// Print the summary code legend after the table
        #[arg(long)]
        legend: bool,
    },

    /// Clone missing repositories and fetch remotes without reporting
    Sync,

    /// List the managed repositories
    List,
}

impl Cli {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            config: self.config.clone(),
            root: self.root.clone(),
            jobs: self.jobs,
            keep_going: self.keep_going,
            no_clone: self.no_clone,
            offline: self.offline,
            color: !self.no_color,
            output: self.output,
        }
    }
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

impl CliApp {
    /// Parse the process arguments
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    /// Use already parsed arguments
    pub fn from_cli(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected command; unexpected errors exit with status 1
    pub async fn run(self) -> anyhow::Result<()> {
        self.init_logging();

        // Set up colored output
        colored::control::set_override(!self.cli.no_color);

        // Change directory if specified
        if let Some(ref dir) = self.cli.directory {
            env::set_current_dir(dir)?;
        }

        // Handle the command
        match self.handle_command().await {
            Ok(_) => Ok(()),
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                exit(1);
            }
        }
    }

    /// Logs go to stderr; `RUST_LOG` overrides the verbosity flag
    fn init_logging(&self) {
        let default_level = if self.cli.verbose { "debug" } else { "warn" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        // A subscriber may already be installed when embedded in tests
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    async fn handle_command(&self) -> anyhow::Result<()> {
        let options = self.cli.run_options();

        match &self.cli.command {
            None => StatusCommand::new(options, false).execute().await,
            Some(Commands::Status { legend }) => StatusCommand::new(options, *legend).execute().await,
            Some(Commands::Sync) => SyncCommand::new(options).execute().await,
            Some(Commands::List) => ListCommand::new(options).execute().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_to_status() {
        let cli = Cli::try_parse_from(["manage-repos"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.jobs, 1);
        assert_eq!(cli.output, OutputFormat::Text);
        assert!(!cli.keep_going);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "manage-repos",
            "sync",
            "--keep-going",
            "-j",
            "4",
            "--root",
            "/srv/repos",
            "--no-clone",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Sync)));
        let options = cli.run_options();
        assert!(options.keep_going);
        assert!(options.no_clone);
        assert_eq!(options.jobs, 4);
        assert_eq!(options.root, PathBuf::from("/srv/repos"));
    }

    #[test]
    fn test_status_output_format() {
        let cli = Cli::try_parse_from(["manage-repos", "status", "-o", "json", "--legend"]).unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(matches!(cli.command, Some(Commands::Status { legend: true })));
    }
}
