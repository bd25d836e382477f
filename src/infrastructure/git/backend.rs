use std::path::Path;
use tracing::{debug, info};

use super::repository::{GitRepository, GitRepositoryError};

/// The version control operations the registry drives during clone and fetch passes
#[cfg_attr(test, mockall::automock)]
pub trait RepositoryBackend: Send + Sync {
    /// Clone `url` into `dest`
    fn clone_repository(&self, url: &str, dest: &Path) -> Result<(), GitRepositoryError>;

    /// Fetch every remote of the working copy at `path`; returns how many were fetched
    fn fetch_all_remotes(&self, path: &Path) -> Result<usize, GitRepositoryError>;

    /// Whether `path` opens as a working copy
    fn is_working_copy(&self, path: &Path) -> bool;
}

/// libgit2 backed implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct Git2Backend;

impl Git2Backend {
    /// Create the libgit2 backend
    pub fn new() -> Self {
        Self
    }
}

impl RepositoryBackend for Git2Backend {
    fn clone_repository(&self, url: &str, dest: &Path) -> Result<(), GitRepositoryError> {
        info!("Cloning {} into {}", url, dest.display());
        GitRepository::clone(url, dest)?;
        Ok(())
    }

    fn fetch_all_remotes(&self, path: &Path) -> Result<usize, GitRepositoryError> {
        let repo = GitRepository::open(path)?;
        let fetched = repo.fetch_all_remotes()?;
        debug!("Fetched {} remote(s) for {}", fetched, path.display());
        Ok(fetched)
    }

    fn is_working_copy(&self, path: &Path) -> bool {
        GitRepository::open(path).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_working_copy() {
        let temp_dir = TempDir::new().unwrap();
        let backend = Git2Backend::new();
        assert!(!backend.is_working_copy(temp_dir.path()));

        GitRepository::init(temp_dir.path()).unwrap();
        assert!(backend.is_working_copy(temp_dir.path()));
    }

    #[test]
    fn test_clone_from_local_path() {
        let temp_dir = TempDir::new().unwrap();
        let source = GitRepository::init(temp_dir.path().join("source")).unwrap();
        let url = source.path().to_string_lossy().to_string();
        let dest = temp_dir.path().join("nested/dest");

        let backend = Git2Backend::new();
        backend.clone_repository(&url, &dest).unwrap();
        assert!(backend.is_working_copy(&dest));
        assert_eq!(backend.fetch_all_remotes(&dest).unwrap(), 1);
    }

    #[test]
    fn test_clone_failure_reports_url() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing-source");
        let url = missing.to_string_lossy().to_string();

        let result = Git2Backend::new().clone_repository(&url, &temp_dir.path().join("dest"));
        assert!(matches!(result, Err(GitRepositoryError::CloneFailed { .. })));
    }

    #[test]
    fn test_fetch_in_plain_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = Git2Backend::new().fetch_all_remotes(temp_dir.path());
        assert!(matches!(result, Err(GitRepositoryError::NotARepository(_))));
    }
}
