use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// 管理対象リポジトリ定義の解析エラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManagedRepoError {
    /// フィールド数が2ではない
    #[error("Expected 2 fields `local_dir,repo_url` but found {0}")]
    WrongFieldCount(usize),

    /// フィールドが空
    #[error("Empty {0} field")]
    EmptyField(&'static str),
}

/// 管理対象リポジトリの定義（ローカルディレクトリ名 + リモートURL）
///
/// 等価性と順序はどちらも `(local_dir, remote_url)` を小文字化した組で判定する。
/// メンバーシップ判定（[`super::managed_repo_registry::ManagedRepoRegistry::is_managed`]）は
/// 大文字小文字を区別する点に注意。
///
/// # Examples
///
/// ```
/// use manage_repos::domain::entities::managed_repo::ManagedRepoEntry;
///
/// let entry = ManagedRepoEntry::parse(" notes , https://example.com/notes ").unwrap();
/// assert_eq!(entry.local_dir(), "notes");
/// assert_eq!(entry.to_string(), "notes,https://example.com/notes");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedRepoEntry {
    /// リポジトリルートからの相対ディレクトリ名
    local_dir: String,

    /// リモートリポジトリのURL
    remote_url: String,
}

impl ManagedRepoEntry {
    /// 新しいManagedRepoEntryを作成（両フィールドをトリムして検証）
    pub fn new(
        local_dir: impl Into<String>,
        remote_url: impl Into<String>,
    ) -> Result<Self, ManagedRepoError> {
        let local_dir = local_dir.into().trim().to_string();
        let remote_url = remote_url.into().trim().to_string();

        if local_dir.is_empty() {
            return Err(ManagedRepoError::EmptyField("local_dir"));
        }
        if remote_url.is_empty() {
            return Err(ManagedRepoError::EmptyField("repo_url"));
        }

        Ok(Self {
            local_dir,
            remote_url,
        })
    }

    /// `local_dir,repo_url` 形式のレコードを解析
    ///
    /// カンマのクォートやエスケープはサポートしない。
    pub fn parse(record: &str) -> Result<Self, ManagedRepoError> {
        let fields: Vec<&str> = record.split(',').collect();
        if fields.len() != 2 {
            return Err(ManagedRepoError::WrongFieldCount(fields.len()));
        }
        Self::new(fields[0], fields[1])
    }

    /// ローカルディレクトリ名
    pub fn local_dir(&self) -> &str {
        &self.local_dir
    }

    /// リモートURL
    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    fn sort_key(&self) -> (String, String) {
        (self.local_dir.to_lowercase(), self.remote_url.to_lowercase())
    }
}

impl fmt::Display for ManagedRepoEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.local_dir, self.remote_url)
    }
}

impl PartialEq for ManagedRepoEntry {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for ManagedRepoEntry {}

impl Hash for ManagedRepoEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sort_key().hash(state);
    }
}

impl PartialOrd for ManagedRepoEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ManagedRepoEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn entry(local_dir: &str, remote_url: &str) -> ManagedRepoEntry {
        ManagedRepoEntry::new(local_dir, remote_url).unwrap()
    }

    #[test]
    fn test_parse_trims_fields() {
        let parsed = ManagedRepoEntry::parse("  a ,\thttps://www.example.com/a  ").unwrap();
        assert_eq!(parsed.local_dir(), "a");
        assert_eq!(parsed.remote_url(), "https://www.example.com/a");
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        assert_eq!(
            ManagedRepoEntry::parse("only-one-field"),
            Err(ManagedRepoError::WrongFieldCount(1))
        );
        assert_eq!(
            ManagedRepoEntry::parse("a,https://example.com/a,extra"),
            Err(ManagedRepoError::WrongFieldCount(3))
        );
    }

    #[test]
    fn test_parse_rejects_empty_fields() {
        assert_eq!(
            ManagedRepoEntry::parse(" ,https://example.com/a"),
            Err(ManagedRepoError::EmptyField("local_dir"))
        );
        assert_eq!(
            ManagedRepoEntry::parse("a,  "),
            Err(ManagedRepoError::EmptyField("repo_url"))
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let samples = [
            entry("a", "https://www.example.com/a"),
            entry("Website", "git@github.com:example/website.git"),
            entry("with space", "file:///srv/git/with space"),
        ];
        for original in samples {
            let reparsed = ManagedRepoEntry::parse(&original.to_string()).unwrap();
            assert_eq!(reparsed, original);
        }
    }

    #[test]
    fn test_equality_ignores_case() {
        let repo_a = entry("a", "https://www.example.com/a");
        let repo_b = entry("b", "https://www.example.com/b");

        assert_eq!(repo_a, repo_a);
        assert_ne!(repo_a, repo_b);
        assert_eq!(repo_a, entry("A", "HTTPS://WWW.EXAMPLE.COM/A"));
    }

    #[test]
    fn test_hash_is_consistent_with_equality() {
        let mut set = HashSet::new();
        set.insert(entry("Notes", "https://example.com/notes"));
        assert!(!set.insert(entry("notes", "https://EXAMPLE.com/notes")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_ordering() {
        let repo_a = entry("a", "https://www.example.com/a");
        let repo_b = entry("b", "https://www.example.com/b");
        assert!(repo_a < repo_b);

        let mut inverse = vec![repo_b.clone(), repo_a.clone()];
        inverse.sort();
        assert_eq!(inverse, vec![repo_a, repo_b]);
    }

    #[test]
    fn test_ordering_is_case_insensitive() {
        let mut entries = vec![
            entry("B", "https://example.com/b"),
            entry("a", "https://example.com/a"),
        ];
        entries.sort();
        let dirs: Vec<&str> = entries.iter().map(|e| e.local_dir()).collect();
        assert_eq!(dirs, vec!["a", "B"]);
    }

    #[test]
    fn test_ordering_falls_back_to_url() {
        let first = entry("same", "https://example.com/1");
        let second = entry("SAME", "https://example.com/2");
        assert_eq!(first.cmp(&second), Ordering::Less);
        assert_eq!(second.cmp(&first), Ordering::Greater);
    }

    #[test]
    fn test_ordering_is_a_total_order() {
        let entries = vec![
            entry("a", "https://example.com/a"),
            entry("A", "https://example.com/A"),
            entry("b", "https://example.com/a"),
            entry("a", "https://example.com/b"),
            entry("Z", "ssh://host/z"),
        ];

        for x in &entries {
            for y in &entries {
                // 三分律と等価性の一貫性
                let ordering = x.cmp(y);
                assert_eq!(ordering == Ordering::Equal, x == y);
                assert_eq!(ordering.reverse(), y.cmp(x));

                for z in &entries {
                    if x <= y && y <= z {
                        assert!(x <= z);
                    }
                }
            }
        }
    }
}
