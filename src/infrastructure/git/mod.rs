/// Backend trait driven by the clone and fetch passes
pub mod backend;
/// libgit2 repository wrapper
pub mod repository;

// Re-export main types for convenience
pub use backend::{Git2Backend, RepositoryBackend};
pub use repository::{GitRepository, GitRepositoryError, ORIGIN};
