use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::application::services::report_builder::{row_outcome, ReportBuilder};
use crate::application::services::repository_inspector::{InspectionError, StatusInspector};
use crate::domain::entities::managed_repo_registry::ManagedRepoRegistry;
use crate::domain::entities::report_row::ReportRow;
use crate::domain::entities::workspace::Workspace;
use crate::domain::value_objects::progress::{Pass, ProgressObserver};
use crate::infrastructure::filesystem::{DirectoryListing, DiscoveryError};

/// StatusCheck関連のエラー
#[derive(Debug, Error)]
pub enum StatusCheckError {
    /// リポジトリルートを列挙できない
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// タスクの実行に失敗した
    #[error("Status task failed: {0}")]
    TaskFailed(String),
}

/// ステータス確認の設定
#[derive(Debug, Clone)]
pub struct StatusCheckConfig {
    /// 並列実行の最大数（0の場合はCPU数）
    pub parallel_jobs: usize,
}

impl Default for StatusCheckConfig {
    fn default() -> Self {
        Self { parallel_jobs: 1 }
    }
}

impl StatusCheckConfig {
    /// 並列数を設定
    pub fn with_parallel_jobs(mut self, parallel_jobs: usize) -> Self {
        self.parallel_jobs = parallel_jobs;
        self
    }

    /// 実際に使う並列数
    pub fn effective_jobs(&self) -> usize {
        match self.parallel_jobs {
            0 => num_cpus::get(),
            jobs => jobs,
        }
    }
}

/// レポート全体の集計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportCounts {
    /// 行数
    pub total: usize,
    /// 作業コピーの数
    pub repositories: usize,
    /// 作業コピーではないディレクトリの数
    pub not_repositories: usize,
    /// 検査に失敗した数
    pub failed: usize,
    /// 管理対象の作業コピーの数
    pub managed: usize,
    /// ダーティな作業コピーの数
    pub dirty: usize,
}

impl ReportCounts {
    fn from_rows(rows: &[ReportRow]) -> Self {
        let mut counts = Self {
            total: rows.len(),
            ..Default::default()
        };
        for row in rows {
            if row.is_failed() {
                counts.failed += 1;
            } else if row.is_repository() {
                counts.repositories += 1;
            } else {
                counts.not_repositories += 1;
            }
            if row.managed().value() == Some(true) {
                counts.managed += 1;
            }
            if row.dirty().value() == Some(true) {
                counts.dirty += 1;
            }
        }
        counts
    }
}

/// ステータスレポート（行はディレクトリ一覧の順）
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// レポート行
    pub rows: Vec<ReportRow>,

    /// 集計
    pub counts: ReportCounts,
}

impl StatusReport {
    /// 行から作成
    pub fn new(rows: Vec<ReportRow>) -> Self {
        let counts = ReportCounts::from_rows(&rows);
        Self { rows, counts }
    }

    /// ディレクトリ名の最大文字数
    pub fn max_name_len(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.dir_name.chars().count())
            .max()
            .unwrap_or(0)
    }
}

/// ステータス確認のユースケース
///
/// ディレクトリ検出 → 検査 → レポート作成
pub struct StatusCheckUseCase {
    /// 設定
    config: StatusCheckConfig,

    /// 検査サービス
    inspector: Arc<dyn StatusInspector>,

    /// 進捗通知先
    observer: Arc<dyn ProgressObserver>,
}

impl StatusCheckUseCase {
    /// 新しいStatusCheckUseCaseインスタンスを作成
    pub fn new(
        config: StatusCheckConfig,
        inspector: Arc<dyn StatusInspector>,
        observer: Arc<dyn ProgressObserver>,
    ) -> Self {
        Self {
            config,
            inspector,
            observer,
        }
    }

    /// リポジトリ群のルートを走査してレポートを作成
    pub async fn execute(
        &self,
        registry: Arc<ManagedRepoRegistry>,
        workspace: Arc<Workspace>,
    ) -> Result<StatusReport, StatusCheckError> {
        let listing = DirectoryListing::discover(&workspace.repos_root)?;
        debug!(
            "Discovered {} directories under {}",
            listing.len(),
            listing.root().display()
        );

        let rows = self
            .build_rows(listing.into_names(), registry, workspace)
            .await;
        Ok(StatusReport::new(rows))
    }

    /// 指定ディレクトリの行を作成（入力順を保持し、行数は常に入力と一致）
    pub async fn build_rows(
        &self,
        dir_names: Vec<String>,
        registry: Arc<ManagedRepoRegistry>,
        workspace: Arc<Workspace>,
    ) -> Vec<ReportRow> {
        let jobs = self.config.effective_jobs();
        if jobs <= 1 || dir_names.len() <= 1 {
            self.build_sequential(dir_names, registry, workspace).await
        } else {
            self.build_parallel(jobs, dir_names, registry, workspace)
                .await
        }
    }

    async fn build_sequential(
        &self,
        dir_names: Vec<String>,
        registry: Arc<ManagedRepoRegistry>,
        workspace: Arc<Workspace>,
    ) -> Vec<ReportRow> {
        let inspector = self.inspector.clone();
        let observer = self.observer.clone();
        let fallback_names = dir_names.clone();
        let fallback_workspace = workspace.clone();

        let result = tokio::task::spawn_blocking(move || {
            ReportBuilder::new(&registry, inspector.as_ref()).build_report(
                &dir_names,
                &workspace,
                observer.as_ref(),
            )
        })
        .await;

        match result {
            Ok(rows) => rows,
            Err(join_err) => {
                warn!("Status task failed: {}", join_err);
                let message = join_err.to_string();
                fallback_names
                    .into_iter()
                    .map(|name| {
                        let error = InspectionError::Task {
                            path: fallback_workspace.repo_path(&name),
                            message: message.clone(),
                        };
                        ReportRow::failed(name, error)
                    })
                    .collect()
            }
        }
    }

    async fn build_parallel(
        &self,
        jobs: usize,
        dir_names: Vec<String>,
        registry: Arc<ManagedRepoRegistry>,
        workspace: Arc<Workspace>,
    ) -> Vec<ReportRow> {
        // 並列度を制限するためのセマフォ
        let semaphore = Arc::new(Semaphore::new(jobs));
        self.observer.pass_started(Pass::Build, dir_names.len());

        let tasks: Vec<_> = dir_names
            .iter()
            .cloned()
            .map(|name| {
                let semaphore = semaphore.clone();
                let registry = registry.clone();
                let inspector = self.inspector.clone();
                let observer = self.observer.clone();
                let path = workspace.repo_path(&name);

                tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| format!("Failed to acquire semaphore: {}", e))?;

                    observer.entry_started(Pass::Build, &name);
                    let row = tokio::task::spawn_blocking(move || {
                        ReportBuilder::new(&registry, inspector.as_ref()).build_row(&name, &path)
                    })
                    .await
                    .map_err(|e| e.to_string())?;
                    observer.entry_finished(Pass::Build, &row.dir_name, row_outcome(&row));
                    Ok::<_, String>(row)
                })
            })
            .collect();

        // すべてのタスクを並列実行
        let results = join_all(tasks).await;
        self.observer.pass_finished(Pass::Build);

        // 失敗したタスクもその行の「不明」として残す
        results
            .into_iter()
            .zip(dir_names)
            .map(|(join_result, name)| {
                let message = match join_result {
                    Ok(Ok(row)) => return row,
                    Ok(Err(message)) => message,
                    Err(join_err) => join_err.to_string(),
                };
                warn!("Status task for {} failed: {}", name, message);
                let error = InspectionError::Task {
                    path: workspace.repo_path(&name),
                    message,
                };
                ReportRow::failed(name, error)
            })
            .collect()
    }
}
