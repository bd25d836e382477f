use std::io::Cursor;
use std::path::PathBuf;
use tokio::fs as async_fs;
use tracing::debug;

use crate::domain::entities::managed_repo_registry::{ManagedRepoRegistry, RegistryError};

/// Reads the `local_dir,repo_url` list file into a registry
#[derive(Debug, Clone)]
pub struct RepoListStore {
    path: PathBuf,
}

impl RepoListStore {
    /// Create a store for the list file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the registry asynchronously
    pub async fn load(&self) -> Result<ManagedRepoRegistry, RegistryError> {
        let content = async_fs::read_to_string(&self.path)
            .await
            .map_err(|source| self.config_error(source))?;

        debug!("Read managed repository list from {}", self.path.display());
        ManagedRepoRegistry::load(Cursor::new(content))
    }

    fn config_error(&self, source: std::io::Error) -> RegistryError {
        RegistryError::Config {
            message: format!("Cannot read managed repository list '{}'", self.path.display()),
            source,
        }
    }
}
