/// `list` subcommand
pub mod list;
/// `status` subcommand
pub mod status;
/// `sync` subcommand
pub mod sync;

pub use list::*;
pub use status::*;
pub use sync::*;

use anyhow::Result;
use colored::Colorize;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use super::OutputFormat;
use crate::application::use_cases::sync_repositories::{
    SyncRepositoriesConfig, SyncRepositoriesUseCase, SyncResult,
};
use crate::domain::entities::managed_repo_registry::{ManagedRepoRegistry, RegistryError};
use crate::domain::entities::workspace::Workspace;
use crate::infrastructure::filesystem::RepoListStore;
use crate::infrastructure::git::Git2Backend;
use crate::presentation::ui::ProgressReporter;

/// Settings shared by every subcommand
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Managed list file
    pub config: PathBuf,
    /// Repositories root
    pub root: PathBuf,
    /// Worker count, 0 for the number of CPUs
    pub jobs: usize,
    /// Continue passes after failing entries
    pub keep_going: bool,
    /// Skip the clone pass
    pub no_clone: bool,
    /// Skip fetching
    pub offline: bool,
    /// Colour and progress bars allowed
    pub color: bool,
    /// Output format
    pub output: OutputFormat,
}

impl RunOptions {
    /// Workspace rooted at the current directory
    pub fn workspace(&self) -> Result<Workspace> {
        let cwd = env::current_dir()?;
        Ok(Workspace::new(cwd)
            .with_repos_root(&self.root)
            .with_repo_list_file(&self.config))
    }

    /// Progress display for this run
    pub fn progress(&self) -> Arc<ProgressReporter> {
        Arc::new(ProgressReporter::new(
            self.color && self.output == OutputFormat::Text,
        ))
    }

    /// Clone and fetch pass settings
    pub fn sync_config(&self) -> SyncRepositoriesConfig {
        SyncRepositoriesConfig::default()
            .with_clone_missing(!self.no_clone)
            .with_refresh_remotes(!self.offline)
            .with_ignore_errors(self.keep_going)
            .with_parallel_jobs(self.jobs)
    }
}

/// Load the managed list, or print how to create it and return `None`.
///
/// An unreadable list ends the run cleanly; a malformed line is an error.
pub async fn load_registry(workspace: &Workspace, options: &RunOptions) -> Result<Option<ManagedRepoRegistry>> {
    let store = RepoListStore::new(&workspace.repo_list_file);

    match store.load().await {
        Ok(registry) => Ok(Some(registry)),
        Err(RegistryError::Config { source, .. }) => {
            tracing::debug!("Managed list unavailable: {}", source);
            eprintln!(
                "{} File '{}' not found in CWD ({}) - copy/modify '{}'",
                "!".yellow().bold(),
                options.config.display(),
                workspace.root_path.display(),
                crate::domain::entities::workspace::EXAMPLE_REPO_LIST_FILE
            );
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Run the clone and fetch passes with a progress display
pub async fn run_sync(
    options: &RunOptions,
    registry: Arc<ManagedRepoRegistry>,
    workspace: Arc<Workspace>,
    progress: Arc<ProgressReporter>,
) -> SyncResult {
    let use_case = SyncRepositoriesUseCase::new(
        options.sync_config(),
        Arc::new(Git2Backend::new()),
        progress,
    );
    use_case.execute(registry, workspace).await
}
