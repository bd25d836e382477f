use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The identity and commit time of a single commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStamp {
    /// Full hex object id
    pub id: String,

    /// Committer timestamp
    pub committed_at: DateTime<Utc>,
}

impl CommitStamp {
    /// Create a new CommitStamp
    pub fn new(id: impl Into<String>, committed_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            committed_at,
        }
    }
}

/// How the local HEAD relates to the `origin` tracking branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteComparison {
    /// Local HEAD and remote-tracking commit are the same commit
    Same,
    /// Local HEAD is newer than (or as old as) a different remote commit
    Ahead,
    /// Local HEAD is strictly older than the remote commit
    Behind,
    /// No `origin` remote, no tracking ref, or no local commit
    Unknown,
}

impl Default for RemoteComparison {
    fn default() -> Self {
        RemoteComparison::Unknown
    }
}

impl RemoteComparison {
    /// Classify two commits by identity, then by commit time.
    ///
    /// This is a timestamp heuristic rather than an ancestry walk: diverged
    /// histories are reported as plain `Ahead` or `Behind`.
    pub fn from_commits(local: &CommitStamp, remote: &CommitStamp) -> Self {
        if local.id == remote.id {
            RemoteComparison::Same
        } else if local.committed_at < remote.committed_at {
            RemoteComparison::Behind
        } else {
            RemoteComparison::Ahead
        }
    }

    /// Single character used in the summary column
    pub fn summary_code(&self) -> char {
        match self {
            RemoteComparison::Same => '.',
            RemoteComparison::Ahead => '>',
            RemoteComparison::Behind => '<',
            RemoteComparison::Unknown => '-',
        }
    }
}
