use serde::Serialize;
use std::fmt;

/// A named pass over a collection of repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    /// Clone managed repositories that have no local working copy
    Clone,
    /// Fetch all remotes of present managed repositories
    Fetch,
    /// Inspect every discovered directory and build report rows
    Build,
}

impl Pass {
    /// Short label used by progress displays
    pub fn label(&self) -> &'static str {
        match self {
            Pass::Clone => "Clone",
            Pass::Fetch => "Fetch",
            Pass::Build => "Build",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What happened to one entry during a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOutcome {
    /// A missing working copy was cloned
    Cloned,
    /// The working copy already existed; nothing to clone
    AlreadyPresent,
    /// All remotes were fetched
    Fetched,
    /// No local working copy to fetch into
    NotPresent,
    /// The directory was inspected and a row produced
    Inspected,
    /// The operation failed for this entry
    Failed,
}

/// Receives structured per-entry events from long running passes.
///
/// Implementations must be cheap and thread safe: passes may run entries
/// on several worker threads at once.
pub trait ProgressObserver: Send + Sync {
    /// A pass over `total` entries begins
    fn pass_started(&self, _pass: Pass, _total: usize) {}

    /// Work on one entry begins
    fn entry_started(&self, _pass: Pass, _name: &str) {}

    /// Work on one entry ended
    fn entry_finished(&self, _pass: Pass, _name: &str, _outcome: EntryOutcome) {}

    /// The pass is over (completed or aborted)
    fn pass_finished(&self, _pass: Pass) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}
