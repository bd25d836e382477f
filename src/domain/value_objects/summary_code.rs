use super::remote_comparison::RemoteComparison;
use serde::{Serialize, Serializer};
use std::fmt;

/// Column header spelling out the five positions
pub const SUMMARY_HEADER: &str = "MRUDC";

/// Character shown when a condition is false or neutral
pub const PLACEHOLDER: char = '.';

/// Character shown in every position when a directory could not be inspected
pub const ERROR_MARKER: char = '?';

/// Meaning of each marker, in column order
pub const SUMMARY_LEGEND: [(char, &str); 8] = [
    ('M', "managed: listed in the managed repository file"),
    ('N', "repository: directory is not a git working copy"),
    ('U', "untracked: working copy has untracked files"),
    ('D', "dirty: working copy has modified or staged changes"),
    ('<', "comparison: local HEAD is behind origin"),
    ('>', "comparison: local HEAD is ahead of origin"),
    ('-', "comparison: no origin or no tracking branch"),
    (ERROR_MARKER, "inspection failed for this directory"),
];

/// Terse fixed-width status summary: Managed, Repository, Untracked, Dirty, Comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SummaryCode([char; 5]);

impl SummaryCode {
    /// Summary for an inspected working copy
    pub fn working_copy(
        managed: bool,
        has_untracked: bool,
        is_dirty: bool,
        comparison: RemoteComparison,
    ) -> Self {
        Self([
            if managed { 'M' } else { PLACEHOLDER },
            PLACEHOLDER,
            if has_untracked { 'U' } else { PLACEHOLDER },
            if is_dirty { 'D' } else { PLACEHOLDER },
            comparison.summary_code(),
        ])
    }

    /// Summary for a directory that is not a working copy
    pub fn not_a_repository() -> Self {
        Self([PLACEHOLDER, 'N', PLACEHOLDER, PLACEHOLDER, PLACEHOLDER])
    }

    /// Summary for a directory whose inspection failed
    pub fn error() -> Self {
        Self([ERROR_MARKER; 5])
    }

    /// The five characters in column order
    pub fn chars(&self) -> [char; 5] {
        self.0
    }
}

impl fmt::Display for SummaryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0 {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl Serialize for SummaryCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_unmanaged_working_copy() {
        let code = SummaryCode::working_copy(false, false, false, RemoteComparison::Same);
        assert_eq!(code.to_string(), ".....");
    }

    #[test]
    fn test_every_marker_set() {
        let code = SummaryCode::working_copy(true, true, true, RemoteComparison::Behind);
        assert_eq!(code.to_string(), "M.UD<");
        assert_eq!(code.to_string().len(), SUMMARY_HEADER.len());
    }

    #[test]
    fn test_not_a_repository_and_error() {
        assert_eq!(SummaryCode::not_a_repository().to_string(), ".N...");
        assert_eq!(SummaryCode::error().to_string(), "?????");
    }

    #[test]
    fn test_serializes_as_string() {
        let code = SummaryCode::working_copy(true, false, true, RemoteComparison::Ahead);
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"M..D>\"");
    }
}
