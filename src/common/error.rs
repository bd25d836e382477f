use thiserror::Error;

use crate::application::services::repository_inspector::InspectionError;
use crate::application::use_cases::status_check::StatusCheckError;
use crate::application::use_cases::sync_repositories::SyncRepositoriesError;
use crate::domain::entities::managed_repo::ManagedRepoError;
use crate::domain::entities::managed_repo_registry::RegistryError;
use crate::infrastructure::filesystem::DiscoveryError;
use crate::infrastructure::git::GitRepositoryError;

/// Crate-wide error, one variant per layer
#[derive(Error, Debug)]
pub enum ManageReposError {
    /// A managed list record did not parse
    #[error(transparent)]
    Entry(#[from] ManagedRepoError),

    /// Loading the list or a clone/fetch pass failed
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// libgit2 wrapper failure
    #[error(transparent)]
    Git(#[from] GitRepositoryError),

    /// A working copy could not be inspected
    #[error(transparent)]
    Inspection(#[from] InspectionError),

    /// The repositories root could not be listed
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// A sync pass failed
    #[error(transparent)]
    Sync(#[from] SyncRepositoriesError),

    /// A status check failed
    #[error(transparent)]
    StatusCheck(#[from] StatusCheckError),

    /// JSON or YAML output failed
    #[error("Serialization error: {message}")]
    SerializationError {
        /// What was being serialised
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ManageReposError {
    /// Wrap a serde failure with a short description
    pub fn serialization_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<serde_yaml::Error> for ManageReposError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::serialization_error_with_source("YAML serialization failed", error)
    }
}

impl From<serde_json::Error> for ManageReposError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization_error_with_source("JSON serialization failed", error)
    }
}
