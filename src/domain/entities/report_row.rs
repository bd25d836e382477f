use super::repository_status::{RepositoryStatusSnapshot, WorkingCopyStatus};
use crate::domain::value_objects::{
    remote_comparison::RemoteComparison, summary_code::SummaryCode,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// レポートのセル値
///
/// 「該当なし」と「不明（エラー）」を、false/0 とは別の状態として区別する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ReportValue<T> {
    /// 値あり
    Value(T),
    /// 作業コピーではないため該当なし
    NotApplicable,
    /// 検査に失敗したため不明
    Unknown,
}

impl<T> ReportValue<T> {
    /// 値を変換
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ReportValue<U> {
        match self {
            ReportValue::Value(value) => ReportValue::Value(f(value)),
            ReportValue::NotApplicable => ReportValue::NotApplicable,
            ReportValue::Unknown => ReportValue::Unknown,
        }
    }

    /// 値がある場合に取得
    pub fn value(self) -> Option<T> {
        match self {
            ReportValue::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// 行の状態
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RowState {
    /// gitの作業コピーではない
    NotARepository,
    /// 検査済みの作業コピー
    Inspected {
        /// 管理対象リストに含まれるか
        managed: bool,
        /// 作業コピーのステータス
        status: WorkingCopyStatus,
    },
    /// 検査に失敗した
    Failed {
        /// エラーメッセージ
        error: String,
    },
}

/// レポートの1行（発見されたディレクトリ1件に対応）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// ディレクトリ名
    pub dir_name: String,

    /// 行の状態
    #[serde(flatten)]
    pub state: RowState,

    /// 5文字のサマリーコード
    pub summary: SummaryCode,
}

impl ReportRow {
    /// 作業コピーではないディレクトリの行を作成
    pub fn not_a_repository(dir_name: impl Into<String>) -> Self {
        Self {
            dir_name: dir_name.into(),
            state: RowState::NotARepository,
            summary: SummaryCode::not_a_repository(),
        }
    }

    /// 検査済み作業コピーの行を作成
    pub fn inspected(dir_name: impl Into<String>, managed: bool, status: WorkingCopyStatus) -> Self {
        let summary = SummaryCode::working_copy(
            managed,
            status.has_untracked(),
            status.is_dirty,
            status.remote_comparison,
        );
        Self {
            dir_name: dir_name.into(),
            state: RowState::Inspected { managed, status },
            summary,
        }
    }

    /// 検査に失敗した行を作成
    pub fn failed(dir_name: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            dir_name: dir_name.into(),
            state: RowState::Failed {
                error: error.to_string(),
            },
            summary: SummaryCode::error(),
        }
    }

    /// スナップショットと管理対象フラグから行を作成
    pub fn from_snapshot(
        dir_name: impl Into<String>,
        managed: bool,
        snapshot: RepositoryStatusSnapshot,
    ) -> Self {
        match snapshot {
            RepositoryStatusSnapshot::NotARepository => Self::not_a_repository(dir_name),
            RepositoryStatusSnapshot::WorkingCopy(status) => {
                Self::inspected(dir_name, managed, status)
            }
        }
    }

    /// 作業コピーの行か
    pub fn is_repository(&self) -> bool {
        matches!(self.state, RowState::Inspected { .. })
    }

    /// 検査に失敗した行か
    pub fn is_failed(&self) -> bool {
        matches!(self.state, RowState::Failed { .. })
    }

    /// エラーメッセージ（失敗した行のみ）
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            RowState::Failed { error } => Some(error),
            _ => None,
        }
    }

    fn cell<'a, T>(&'a self, f: impl FnOnce(bool, &'a WorkingCopyStatus) -> T) -> ReportValue<T> {
        match &self.state {
            RowState::Inspected { managed, status } => ReportValue::Value(f(*managed, status)),
            RowState::NotARepository => ReportValue::NotApplicable,
            RowState::Failed { .. } => ReportValue::Unknown,
        }
    }

    /// 管理対象か
    pub fn managed(&self) -> ReportValue<bool> {
        self.cell(|managed, _| managed)
    }

    /// ダーティか
    pub fn dirty(&self) -> ReportValue<bool> {
        self.cell(|_, status| status.is_dirty)
    }

    /// 未追跡ファイル数
    pub fn untracked(&self) -> ReportValue<usize> {
        self.cell(|_, status| status.untracked_count)
    }

    /// 変更ファイル数
    pub fn modified(&self) -> ReportValue<usize> {
        self.cell(|_, status| status.modified_count)
    }

    /// ステージ済みの差分数
    pub fn staged(&self) -> ReportValue<usize> {
        self.cell(|_, status| status.staged_count)
    }

    /// ローカルブランチ一覧
    pub fn branches(&self) -> ReportValue<&BTreeSet<String>> {
        self.cell(|_, status| &status.branch_names)
    }

    /// アクティブブランチ
    pub fn active_branch(&self) -> ReportValue<Option<&str>> {
        self.cell(|_, status| status.active_branch.as_deref())
    }

    /// originとの比較
    pub fn remote_comparison(&self) -> ReportValue<RemoteComparison> {
        self.cell(|_, status| status.remote_comparison)
    }
}
