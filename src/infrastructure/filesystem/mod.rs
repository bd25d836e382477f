/// Sibling directory discovery
pub mod directory_listing;
/// Managed list file reader
pub mod repo_list_store;

pub use directory_listing::{DirectoryListing, DiscoveryError};
pub use repo_list_store::RepoListStore;
