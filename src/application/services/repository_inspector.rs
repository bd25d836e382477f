use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::common::result::ResultExt;
use crate::domain::entities::repository_status::{RepositoryStatusSnapshot, WorkingCopyStatus};
use crate::domain::value_objects::remote_comparison::RemoteComparison;
use crate::infrastructure::git::repository::{GitRepository, GitRepositoryError, ORIGIN};

/// ディレクトリ検査のエラー（その行だけに閉じ込められる）
#[derive(Debug, Error)]
pub enum InspectionError {
    /// gitの読み取りに失敗した
    #[error("Inspection of {} failed: {source}", .path.display())]
    Git {
        /// 検査したパス
        path: PathBuf,
        /// 元のエラー
        #[source]
        source: GitRepositoryError,
    },

    /// 検査タスクが異常終了した
    #[error("Inspection task for {} failed: {message}", .path.display())]
    Task { path: PathBuf, message: String },
}

impl InspectionError {
    fn git(path: &Path, source: GitRepositoryError) -> Self {
        Self::Git {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// ディレクトリをステータススナップショットに変換する
#[cfg_attr(test, mockall::automock)]
pub trait StatusInspector: Send + Sync {
    /// 指定パスを検査
    ///
    /// 作業コピーでない場合はエラーではなく `NotARepository` を返す。
    fn inspect(&self, path: &Path) -> Result<RepositoryStatusSnapshot, InspectionError>;
}

/// 検査オプション
#[derive(Debug, Clone, Copy)]
pub struct InspectOptions {
    /// 比較の前にoriginをフェッチするか
    pub fetch_remote: bool,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self { fetch_remote: true }
    }
}

/// libgit2を使ったリポジトリ検査サービス
#[derive(Debug, Clone, Default)]
pub struct RepositoryInspector {
    options: InspectOptions,
}

impl RepositoryInspector {
    /// 新しいRepositoryInspectorを作成
    pub fn new(options: InspectOptions) -> Self {
        Self { options }
    }

    /// フェッチせずに既存のリモート追跡参照で比較するInspector
    pub fn offline() -> Self {
        Self::new(InspectOptions {
            fetch_remote: false,
        })
    }

    /// 作業コピーのステータスを計算
    ///
    /// 計算順序: 未追跡 → 変更 → ステージ済み → ブランチ → アクティブブランチ → 比較
    pub fn working_copy_status(
        &self,
        repo: &GitRepository,
    ) -> Result<WorkingCopyStatus, GitRepositoryError> {
        let untracked_count = repo.untracked_count()?;
        let modified_count = repo.modified_count()?;

        // コミットのないブランチではHEADのツリーが解決できない
        let staged = repo.staged_count();
        let staged_available = staged.is_ok();
        let staged_count = staged.unwrap_or_default_logged("staged count");

        let branches = repo.local_branches()?;
        let active_branch = repo.active_branch()?;

        let index_has_entries = !staged_available && repo.index_entry_count()? > 0;
        let is_dirty = modified_count > 0 || staged_count > 0 || index_has_entries;

        let remote_comparison = self.compare_with_remote(repo, active_branch.as_deref())?;

        Ok(WorkingCopyStatus {
            is_dirty,
            untracked_count,
            modified_count,
            staged_count,
            remote_comparison,
            ..Default::default()
        }
        .with_branches(branches, active_branch))
    }

    /// originのリモート追跡コミットとHEADを比較
    ///
    /// originがない、追跡参照がない、HEADがない場合は `Unknown`。
    /// コミット時刻によるヒューリスティックであり、祖先関係は調べない。
    pub fn compare_with_remote(
        &self,
        repo: &GitRepository,
        active_branch: Option<&str>,
    ) -> Result<RemoteComparison, GitRepositoryError> {
        if !repo.has_remote(ORIGIN) {
            return Ok(RemoteComparison::Unknown);
        }
        let Some(branch) = active_branch else {
            return Ok(RemoteComparison::Unknown);
        };

        if self.options.fetch_remote {
            repo.fetch_remote(ORIGIN)?;
        }

        let Some(remote) = repo.remote_tracking_commit(ORIGIN, branch)? else {
            debug!("{}: no tracking ref for '{}'", repo.path().display(), branch);
            return Ok(RemoteComparison::Unknown);
        };
        let Some(local) = repo.head_commit()? else {
            return Ok(RemoteComparison::Unknown);
        };

        Ok(RemoteComparison::from_commits(&local, &remote))
    }
}

impl StatusInspector for RepositoryInspector {
    fn inspect(&self, path: &Path) -> Result<RepositoryStatusSnapshot, InspectionError> {
        let repo = match GitRepository::open(path) {
            Ok(repo) => repo,
            Err(GitRepositoryError::NotARepository(_)) => {
                return Ok(RepositoryStatusSnapshot::NotARepository)
            }
            Err(e) => return Err(InspectionError::git(path, e)),
        };

        let status = self
            .working_copy_status(&repo)
            .map_err(|e| InspectionError::git(path, e))?;
        Ok(RepositoryStatusSnapshot::WorkingCopy(status))
    }
}
