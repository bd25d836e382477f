//! # manage-repos - Managed Working Copy Reconciler
//!
//! `manage-repos` keeps a directory of sibling git working copies in line with a
//! declarative list of managed repositories, then reports the state of every
//! directory it finds there.
//!
//! ## Features
//!
//! - **Reconciliation**: Clone managed repositories that have no local working copy
//! - **Remote refresh**: Fetch all remotes of present working copies
//! - **Status report**: Untracked, modified and staged counts, branches and an
//!   ahead/behind comparison against `origin` for every sibling directory
//! - **Parallel Operations**: Optional bounded worker pool for each pass
//!
//! ## Quick Start
//!
//! 1. Create the managed list (`config/repos.csv`, next to the tool's directory):
//!
//! ```text
//! # local_dir,repo_url
//! dotfiles,git@github.com:example/dotfiles.git
//! notes,https://github.com/example/notes.git
//! ```
//!
//! 2. Run from that directory:
//!
//! ```bash
//! manage-repos            # clone, fetch, then print the status table
//! manage-repos sync       # clone and fetch only
//! manage-repos list       # show the managed entries
//! ```
//!
//! ## Architecture
//!
//! - [`domain`]: Managed entries, the registry and report rows
//! - [`application`]: Inspection, report building and the sync/status use cases
//! - [`infrastructure`]: libgit2 access and file system discovery
//! - [`presentation`]: CLI interface and terminal output
//! - [`common`]: Shared error handling
//!
//! ## Domain Model
//!
//! - [`domain::entities::managed_repo::ManagedRepoEntry`]: One declared repository
//! - [`domain::entities::managed_repo_registry::ManagedRepoRegistry`]: The managed list
//! - [`domain::entities::repository_status::RepositoryStatusSnapshot`]: Facts about one directory
//! - [`domain::entities::report_row::ReportRow`]: One line of the status report
//!
//! ## Examples
//!
//! ```rust,no_run
//! use manage_repos::application::services::report_builder::ReportBuilder;
//! use manage_repos::application::services::repository_inspector::RepositoryInspector;
//! use manage_repos::domain::entities::managed_repo_registry::ManagedRepoRegistry;
//! use manage_repos::domain::entities::workspace::Workspace;
//! use manage_repos::domain::value_objects::progress::NoopObserver;
//! use manage_repos::infrastructure::filesystem::DirectoryListing;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let workspace = Workspace::new(std::env::current_dir()?);
//! let registry = ManagedRepoRegistry::from_lines(["notes,https://example.com/notes.git"])?;
//! let listing = DirectoryListing::discover(&workspace.repos_root)?;
//!
//! let inspector = RepositoryInspector::offline();
//! let rows = ReportBuilder::new(&registry, &inspector)
//!     .build_report(listing.names(), &workspace, &NoopObserver);
//!
//! for row in rows {
//!     println!("{} {}", row.summary, row.dir_name);
//! }
//! # Ok(())
//! # }
//! ```

// Documentation attributes
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::ManageReposError;
pub use crate::common::result::ManageResult as Result;
