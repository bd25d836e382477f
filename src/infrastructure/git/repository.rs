use chrono::{TimeZone, Utc};
use git2::{
    BranchType, Commit, Cred, CredentialType, ErrorCode, FetchOptions, RemoteCallbacks,
    Repository as Git2Repository, StatusOptions,
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::domain::value_objects::remote_comparison::CommitStamp;

/// Name of the remote used for ahead/behind comparison
pub const ORIGIN: &str = "origin";

const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// Git repository operations related errors
#[derive(Debug, Error)]
pub enum GitRepositoryError {
    /// Path exists but is not a non-bare working copy
    #[error("Not a git working copy: {0}")]
    NotARepository(String),

    /// Clone failed
    #[error("Git clone of {url} failed: {source}")]
    CloneFailed {
        /// Remote URL
        url: String,
        /// libgit2 error
        #[source]
        source: git2::Error,
    },

    /// Fetch failed
    #[error("Git fetch from remote '{remote}' failed: {source}")]
    FetchFailed {
        /// Remote name
        remote: String,
        /// libgit2 error
        #[source]
        source: git2::Error,
    },

    /// No remote with this name
    #[error("Remote not found: {0}")]
    RemoteNotFound(String),

    /// Commit time cannot be represented
    #[error("Commit {0} has an out of range timestamp")]
    InvalidCommitTime(String),

    /// Other libgit2 error
    #[error("Git2 error: {0}")]
    Git2Error(#[from] git2::Error),

    /// Filesystem error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Wrapper around git2::Repository with the read and fetch operations we need
pub struct GitRepository {
    /// The underlying git2 repository
    repo: Git2Repository,

    /// Repository path
    path: PathBuf,
}

impl std::fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepository")
            .field("path", &self.path)
            .field("repo", &"<git2::Repository>")
            .finish()
    }
}

impl GitRepository {
    /// Open the working copy at exactly `path` (no upward discovery).
    ///
    /// Missing directories, plain directories and bare repositories all fail
    /// with [`GitRepositoryError::NotARepository`]; anything else is a real error.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GitRepositoryError> {
        let path_buf = path.as_ref().to_path_buf();

        if !path_buf.is_dir() {
            return Err(GitRepositoryError::NotARepository(
                path_buf.display().to_string(),
            ));
        }

        let repo = Git2Repository::open(&path_buf).map_err(|e| match e.code() {
            ErrorCode::NotFound => GitRepositoryError::NotARepository(path_buf.display().to_string()),
            _ => GitRepositoryError::Git2Error(e),
        })?;

        if repo.is_bare() {
            return Err(GitRepositoryError::NotARepository(
                path_buf.display().to_string(),
            ));
        }

        Ok(Self {
            repo,
            path: path_buf,
        })
    }

    /// Initialize a new Git repository
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Self, GitRepositoryError> {
        let path_buf = path.as_ref().to_path_buf();

        // Create directory if it doesn't exist
        if !path_buf.exists() {
            std::fs::create_dir_all(&path_buf)?;
        }

        let repo = Git2Repository::init(&path_buf)?;

        Ok(Self {
            repo,
            path: path_buf,
        })
    }

    /// Clone a remote repository into `target_path`
    pub fn clone(url: &str, target_path: &Path) -> Result<Self, GitRepositoryError> {
        // Create parent directories if they don't exist
        if let Some(parent) = target_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut builder = git2::build::RepoBuilder::new();
        builder.fetch_options(Self::fetch_options());

        debug!("Cloning {} into {}", url, target_path.display());
        let repo = builder
            .clone(url, target_path)
            .map_err(|source| GitRepositoryError::CloneFailed {
                url: url.to_string(),
                source,
            })?;

        Ok(Self {
            repo,
            path: target_path.to_path_buf(),
        })
    }

    /// Fetch one remote using its configured refspecs (no merge, no checkout)
    pub fn fetch_remote(&self, remote_name: &str) -> Result<(), GitRepositoryError> {
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|_| GitRepositoryError::RemoteNotFound(remote_name.to_string()))?;

        let mut fetch_options = Self::fetch_options();

        // Empty means the remote's configured refspecs
        let refs: Vec<&str> = vec![];

        debug!("Fetching remote '{}' in {}", remote_name, self.path.display());
        remote
            .fetch(&refs, Some(&mut fetch_options), None)
            .map_err(|source| GitRepositoryError::FetchFailed {
                remote: remote_name.to_string(),
                source,
            })
    }

    /// Fetch every configured remote; returns how many were fetched
    pub fn fetch_all_remotes(&self) -> Result<usize, GitRepositoryError> {
        let remote_names = self.repo.remotes()?;
        let mut fetched = 0;

        for remote_name in remote_names.iter().flatten() {
            self.fetch_remote(remote_name)?;
            fetched += 1;
        }

        Ok(fetched)
    }

    /// Check if remote exists
    pub fn has_remote(&self, name: &str) -> bool {
        self.repo.find_remote(name).is_ok()
    }

    /// Number of files in the working tree that are not tracked or ignored
    pub fn untracked_count(&self) -> Result<usize, GitRepositoryError> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses
            .iter()
            .filter(|entry| entry.status().is_wt_new())
            .count())
    }

    /// Number of tracked files whose working tree content differs from the index
    pub fn modified_count(&self) -> Result<usize, GitRepositoryError> {
        let diff = self.repo.diff_index_to_workdir(None, None)?;
        Ok(diff.deltas().count())
    }

    /// Number of differences between HEAD's tree and the index.
    ///
    /// Fails when HEAD cannot be resolved to a tree (e.g. no commits yet).
    pub fn staged_count(&self) -> Result<usize, GitRepositoryError> {
        let head_tree = self.repo.head()?.peel_to_tree()?;
        let diff = self.repo.diff_tree_to_index(Some(&head_tree), None, None)?;
        Ok(diff.deltas().count())
    }

    /// Number of entries recorded in the index
    pub fn index_entry_count(&self) -> Result<usize, GitRepositoryError> {
        Ok(self.repo.index()?.len())
    }

    /// List local branch names (unsorted, as libgit2 yields them)
    pub fn local_branches(&self) -> Result<Vec<String>, GitRepositoryError> {
        let mut branch_names = Vec::new();

        for branch_result in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch_result?;
            if let Some(name) = branch.name()? {
                branch_names.push(name.to_string());
            }
        }

        Ok(branch_names)
    }

    /// Name of the checked out branch; `None` on a detached or unborn HEAD
    pub fn active_branch(&self) -> Result<Option<String>, GitRepositoryError> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => Ok(head.shorthand().map(str::to_string)),
            Ok(_) => Ok(None),
            Err(e) if Self::is_missing_head(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// The commit HEAD points at, `None` on an unborn branch
    pub fn head_commit(&self) -> Result<Option<CommitStamp>, GitRepositoryError> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if Self::is_missing_head(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let commit = head.peel_to_commit()?;
        Self::commit_stamp(&commit).map(Some)
    }

    /// The commit of `refs/remotes/<remote>/<branch>`, `None` when the ref is absent
    pub fn remote_tracking_commit(
        &self,
        remote_name: &str,
        branch: &str,
    ) -> Result<Option<CommitStamp>, GitRepositoryError> {
        let ref_name = format!("refs/remotes/{}/{}", remote_name, branch);
        let reference = match self.repo.find_reference(&ref_name) {
            Ok(reference) => reference,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let commit = reference.peel_to_commit()?;
        Self::commit_stamp(&commit).map(Some)
    }

    /// Get repository path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the underlying git2 repository
    pub fn git2_repo(&self) -> &Git2Repository {
        &self.repo
    }

    // Private helper methods

    fn is_missing_head(error: &git2::Error) -> bool {
        matches!(error.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound)
    }

    fn commit_stamp(commit: &Commit<'_>) -> Result<CommitStamp, GitRepositoryError> {
        let committed_at = Utc
            .timestamp_opt(commit.time().seconds(), 0)
            .single()
            .ok_or_else(|| GitRepositoryError::InvalidCommitTime(commit.id().to_string()))?;
        Ok(CommitStamp::new(commit.id().to_string(), committed_at))
    }

    /// Fetch options offering SSH agent or default credentials
    fn fetch_options<'a>() -> FetchOptions<'a> {
        let mut callbacks = RemoteCallbacks::new();
        let mut attempts = 0;

        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            // libgit2 keeps asking while credentials are rejected
            attempts += 1;
            if attempts > MAX_CREDENTIAL_ATTEMPTS {
                return Err(git2::Error::from_str("Authentication failed"));
            }

            if allowed_types.contains(CredentialType::SSH_KEY) {
                Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
            } else if allowed_types.contains(CredentialType::DEFAULT) {
                Cred::default()
            } else {
                Err(git2::Error::from_str("No supported authentication method"))
            }
        });

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(callbacks);
        fetch_options
    }
}
