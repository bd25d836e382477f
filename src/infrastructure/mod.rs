//! Infrastructure layer modules
//!
//! This layer provides concrete implementations for external system interactions:
//! - Git operations (open, clone, fetch, status reads) via libgit2
//! - File system operations (managed list file, directory discovery)

/// Managed list file and directory discovery
pub mod filesystem;
/// libgit2 access
pub mod git;

// Re-export commonly used types
pub use filesystem::{DirectoryListing, RepoListStore};
pub use git::{Git2Backend, GitRepository, RepositoryBackend};
