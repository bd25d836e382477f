use crate::domain::value_objects::remote_comparison::RemoteComparison;
use serde::Serialize;
use std::collections::BTreeSet;

/// 作業コピーのステータス情報
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct WorkingCopyStatus {
    /// 未コミットの変更（変更またはステージ済み）があるか
    pub is_dirty: bool,

    /// 未追跡ファイル数
    pub untracked_count: usize,

    /// インデックスと作業ツリーで差分のある追跡ファイル数
    pub modified_count: usize,

    /// HEADとインデックスの差分数（計算できない場合は0）
    pub staged_count: usize,

    /// ローカルブランチ名（辞書順）
    pub branch_names: BTreeSet<String>,

    /// 現在チェックアウトされているブランチ（常に `branch_names` に含まれる）
    pub active_branch: Option<String>,

    /// originとの比較結果
    pub remote_comparison: RemoteComparison,
}

impl WorkingCopyStatus {
    /// 未追跡ファイルがあるか
    pub fn has_untracked(&self) -> bool {
        self.untracked_count > 0
    }

    /// 指定ブランチがアクティブか
    pub fn is_active_branch(&self, name: &str) -> bool {
        self.active_branch.as_deref() == Some(name)
    }

    /// ブランチ一覧を設定（アクティブブランチが一覧にない場合は解除）
    pub fn with_branches(
        mut self,
        branch_names: impl IntoIterator<Item = String>,
        active_branch: Option<String>,
    ) -> Self {
        self.branch_names = branch_names.into_iter().collect();
        self.active_branch = active_branch.filter(|name| self.branch_names.contains(name));
        self
    }
}

/// ディレクトリ1件分のステータススナップショット
///
/// 作業コピーでない場合は他のフィールドを一切持たない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RepositoryStatusSnapshot {
    /// gitの作業コピーではない
    NotARepository,
    /// gitの作業コピー
    WorkingCopy(WorkingCopyStatus),
}

impl RepositoryStatusSnapshot {
    /// 作業コピーとして存在するか
    pub fn exists_as_repo(&self) -> bool {
        matches!(self, RepositoryStatusSnapshot::WorkingCopy(_))
    }

    /// 作業コピーのステータス（存在する場合）
    pub fn working_copy(&self) -> Option<&WorkingCopyStatus> {
        match self {
            RepositoryStatusSnapshot::WorkingCopy(status) => Some(status),
            RepositoryStatusSnapshot::NotARepository => None,
        }
    }
}
