use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;
use walkdir::WalkDir;

/// Directory discovery errors
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The root is missing or not a directory
    #[error("Repositories root not found: {0}")]
    RootNotFound(String),

    /// Reading the root failed
    #[error("Failed to list {path}: {source}")]
    ReadFailed {
        /// Root being listed
        path: String,
        /// Underlying walk error
        #[source]
        source: walkdir::Error,
    },
}

/// Immediate subdirectories of the repositories root
#[derive(Debug, Clone)]
pub struct DirectoryListing {
    root: PathBuf,
    names: Vec<String>,
}

impl DirectoryListing {
    /// List the directories directly under `root`, sorted case-insensitively.
    ///
    /// Files are skipped; symlinks to directories are listed. Names that are
    /// not valid UTF-8 are skipped with a warning.
    pub fn discover(root: impl AsRef<Path>) -> Result<Self, DiscoveryError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(DiscoveryError::RootNotFound(root.display().to_string()));
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|source| DiscoveryError::ReadFailed {
                path: root.display().to_string(),
                source,
            })?;
            if !entry.path().is_dir() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => names.push(name.to_string()),
                None => warn!("Skipping non UTF-8 directory name {:?}", entry.file_name()),
            }
        }

        // Lowercase first; the ordinal tiebreak keeps names that differ only in case stable
        names.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));

        Ok(Self { root, names })
    }

    /// Root the listing was taken from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory names in display order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Take the directory names
    pub fn into_names(self) -> Vec<String> {
        self.names
    }

    /// Number of directories
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no directories were found
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
