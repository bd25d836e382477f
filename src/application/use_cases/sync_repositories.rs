use futures::future::join_all;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::domain::entities::managed_repo::ManagedRepoEntry;
use crate::domain::entities::managed_repo_registry::{
    EntryStep, ManagedRepoRegistry, PassSummary, RegistryError,
};
use crate::domain::entities::workspace::Workspace;
use crate::domain::value_objects::progress::{EntryOutcome, Pass, ProgressObserver};
use crate::infrastructure::git::RepositoryBackend;

/// SyncRepositories関連のエラー
#[derive(Debug, Error)]
pub enum SyncRepositoriesError {
    /// エントリの処理に失敗した
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// タスクの実行に失敗した
    #[error("Sync task failed: {0}")]
    TaskFailed(String),
}

/// リポジトリ同期の設定
#[derive(Debug, Clone)]
pub struct SyncRepositoriesConfig {
    /// 存在しないリポジトリをクローンするか
    pub clone_missing: bool,

    /// 存在するリポジトリの全リモートをフェッチするか
    pub refresh_remotes: bool,

    /// エントリ単位のエラーを無視して続行するか
    pub ignore_errors: bool,

    /// 並列実行の最大数（0の場合はCPU数）
    pub parallel_jobs: usize,
}

impl Default for SyncRepositoriesConfig {
    fn default() -> Self {
        Self {
            clone_missing: true,
            refresh_remotes: true,
            ignore_errors: false,
            parallel_jobs: 1,
        }
    }
}

impl SyncRepositoriesConfig {
    /// クローンパスの有無を設定
    pub fn with_clone_missing(mut self, clone_missing: bool) -> Self {
        self.clone_missing = clone_missing;
        self
    }

    /// フェッチパスの有無を設定
    pub fn with_refresh_remotes(mut self, refresh_remotes: bool) -> Self {
        self.refresh_remotes = refresh_remotes;
        self
    }

    /// エラー無視の有無を設定
    pub fn with_ignore_errors(mut self, ignore_errors: bool) -> Self {
        self.ignore_errors = ignore_errors;
        self
    }

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

/// 1パスの結果
#[derive(Debug)]
pub enum PassResult {
    /// 設定により実行しなかった
    Skipped,
    /// 完了した（無視されたエラーを含む場合あり）
    Completed(PassSummary),
    /// エラーにより中断した
    Aborted(SyncRepositoriesError),
}

impl PassResult {
    /// 完了した場合のサマリー
    pub fn summary(&self) -> Option<&PassSummary> {
        match self {
            PassResult::Completed(summary) => Some(summary),
            _ => None,
        }
    }

    /// 中断または無視されたエラーがないか
    pub fn is_success(&self) -> bool {
        match self {
            PassResult::Skipped => true,
            PassResult::Completed(summary) => summary.is_success(),
            PassResult::Aborted(_) => false,
        }
    }

    fn from_result(result: Result<PassSummary, SyncRepositoriesError>) -> Self {
        match result {
            Ok(summary) => PassResult::Completed(summary),
            Err(e) => PassResult::Aborted(e),
        }
    }
}

/// 同期操作の結果
#[derive(Debug)]
pub struct SyncResult {
    /// クローンパスの結果
    pub clone_pass: PassResult,

    /// フェッチパスの結果
    pub fetch_pass: PassResult,
}

impl SyncResult {
    /// 両パスとも失敗がないか
    pub fn is_success(&self) -> bool {
        self.clone_pass.is_success() && self.fetch_pass.is_success()
    }

    /// 新規クローンされたリポジトリの数
    pub fn cloned_count(&self) -> usize {
        Self::count(&self.clone_pass, EntryOutcome::Cloned)
    }

    /// 既に存在していたリポジトリの数
    pub fn present_count(&self) -> usize {
        Self::count(&self.clone_pass, EntryOutcome::AlreadyPresent)
    }

    /// フェッチされたリポジトリの数
    pub fn fetched_count(&self) -> usize {
        Self::count(&self.fetch_pass, EntryOutcome::Fetched)
    }

    /// 失敗したエントリの数（中断したパスは1件として数える）
    pub fn failure_count(&self) -> usize {
        [&self.clone_pass, &self.fetch_pass]
            .iter()
            .map(|pass| match pass {
                PassResult::Skipped => 0,
                PassResult::Completed(summary) => summary.failures.len(),
                PassResult::Aborted(_) => 1,
            })
            .sum()
    }

    fn count(pass: &PassResult, outcome: EntryOutcome) -> usize {
        pass.summary().map(|s| s.count(outcome)).unwrap_or(0)
    }
}

/// リポジトリ同期のユースケース
///
/// クローンパスが中断してもフェッチパスは実行する。
pub struct SyncRepositoriesUseCase {
    /// 同期設定
    config: SyncRepositoriesConfig,

    /// バージョン管理バックエンド
    backend: Arc<dyn RepositoryBackend>,

    /// 進捗通知先
    observer: Arc<dyn ProgressObserver>,
}

impl SyncRepositoriesUseCase {
    /// 新しいSyncRepositoriesUseCaseインスタンスを作成
    pub fn new(
        config: SyncRepositoriesConfig,
        backend: Arc<dyn RepositoryBackend>,
        observer: Arc<dyn ProgressObserver>,
    ) -> Self {
        Self {
            config,
            backend,
            observer,
        }
    }

    /// リポジトリ同期を実行
    pub async fn execute(
        &self,
        registry: Arc<ManagedRepoRegistry>,
        workspace: Arc<Workspace>,
    ) -> SyncResult {
        // 1. 存在しないリポジトリのクローン
        let clone_pass = if self.config.clone_missing {
            self.run_pass(Pass::Clone, registry.clone(), workspace.clone())
                .await
        } else {
            PassResult::Skipped
        };

        if let PassResult::Aborted(e) = &clone_pass {
            warn!("Clone pass aborted: {}", e);
        }

        // 2. リモートのフェッチ
        let fetch_pass = if self.config.refresh_remotes {
            self.run_pass(Pass::Fetch, registry, workspace).await
        } else {
            PassResult::Skipped
        };

        if let PassResult::Aborted(e) = &fetch_pass {
            warn!("Fetch pass aborted: {}", e);
        }

        let result = SyncResult {
            clone_pass,
            fetch_pass,
        };
        info!(
            "Sync finished: {} cloned, {} fetched, {} failure(s)",
            result.cloned_count(),
            result.fetched_count(),
            result.failure_count()
        );
        result
    }

    async fn run_pass(
        &self,
        pass: Pass,
        registry: Arc<ManagedRepoRegistry>,
        workspace: Arc<Workspace>,
    ) -> PassResult {
        let jobs = self.config.effective_jobs();
        let result = if jobs <= 1 || registry.len() <= 1 {
            self.run_sequential(pass, registry, workspace).await
        } else {
            self.run_parallel(pass, jobs, registry, workspace).await
        };
        PassResult::from_result(result)
    }

    /// レジストリ順に1件ずつ処理
    async fn run_sequential(
        &self,
        pass: Pass,
        registry: Arc<ManagedRepoRegistry>,
        workspace: Arc<Workspace>,
    ) -> Result<PassSummary, SyncRepositoriesError> {
        let backend = self.backend.clone();
        let observer = self.observer.clone();
        let ignore_errors = self.config.ignore_errors;

        let result = tokio::task::spawn_blocking(move || match pass {
            Pass::Clone => registry.sync_missing(
                backend.as_ref(),
                &workspace,
                ignore_errors,
                observer.as_ref(),
            ),
            _ => registry.refresh_remotes(
                backend.as_ref(),
                &workspace,
                ignore_errors,
                observer.as_ref(),
            ),
        })
        .await
        .map_err(|e| SyncRepositoriesError::TaskFailed(e.to_string()))?;

        Ok(result?)
    }

    /// セマフォで並列数を制限して処理し、結果をレジストリ順に並べ直す
    ///
    /// 同じ`local_dir`を持つエントリは1つのタスクでレジストリ順に処理する。
    async fn run_parallel(
        &self,
        pass: Pass,
        jobs: usize,
        registry: Arc<ManagedRepoRegistry>,
        workspace: Arc<Workspace>,
    ) -> Result<PassSummary, SyncRepositoriesError> {
        let step: EntryStep = match pass {
            Pass::Clone => ManagedRepoRegistry::clone_entry,
            _ => ManagedRepoRegistry::refresh_entry,
        };
        let ignore_errors = self.config.ignore_errors;

        // 並列度を制限するためのセマフォ
        let semaphore = Arc::new(Semaphore::new(jobs));
        // 中断後は未着手のエントリを処理しない
        let aborted = Arc::new(AtomicBool::new(false));

        self.observer.pass_started(pass, registry.len());

        let tasks: Vec<_> = group_by_directory(&registry)
            .into_iter()
            .map(|group| {
                let semaphore = semaphore.clone();
                let aborted = aborted.clone();
                let backend = self.backend.clone();
                let observer = self.observer.clone();
                let workspace = workspace.clone();

                tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await.map_err(|e| {
                        SyncRepositoriesError::TaskFailed(format!(
                            "Failed to acquire semaphore: {}",
                            e
                        ))
                    })?;

                    let mut finished = Vec::with_capacity(group.len());
                    for (index, entry) in group {
                        if aborted.load(Ordering::SeqCst) {
                            break;
                        }

                        let name = entry.local_dir().to_string();
                        observer.entry_started(pass, &name);

                        let backend = backend.clone();
                        let workspace = workspace.clone();
                        let result = tokio::task::spawn_blocking(move || {
                            step(&entry, backend.as_ref(), &workspace)
                        })
                        .await
                        .map_err(|e| SyncRepositoriesError::TaskFailed(e.to_string()))?;

                        let outcome = result.as_ref().copied().unwrap_or(EntryOutcome::Failed);
                        observer.entry_finished(pass, &name, outcome);

                        let failed = result.is_err();
                        finished.push((index, name, result));
                        if failed && !ignore_errors {
                            aborted.store(true, Ordering::SeqCst);
                            break;
                        }
                    }
                    Ok::<_, SyncRepositoriesError>(finished)
                })
            })
            .collect();

        // すべてのタスクを並列実行
        let results = join_all(tasks).await;
        self.observer.pass_finished(pass);

        let mut finished = Vec::with_capacity(registry.len());
        let mut first_error: Option<SyncRepositoriesError> = None;

        for join_result in results {
            match join_result {
                Ok(Ok(entries)) => finished.extend(entries),
                Ok(Err(e)) => {
                    first_error.get_or_insert(e);
                }
                Err(join_err) => {
                    first_error.get_or_insert(SyncRepositoriesError::TaskFailed(join_err.to_string()));
                }
            }
        }
        finished.sort_by_key(|(index, _, _)| *index);

        let mut summary = PassSummary::new(pass);
        for (_, name, result) in finished {
            match result {
                Ok(outcome) => summary.outcomes.push((name, outcome)),
                Err(e) => {
                    summary.outcomes.push((name, EntryOutcome::Failed));
                    if ignore_errors {
                        warn!("{} pass: ignoring error: {}", pass, e);
                        summary.failures.push(e);
                    } else if first_error.is_none() {
                        first_error = Some(e.into());
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(summary),
        }
    }
}

/// `local_dir`ごとにエントリをまとめる（登録順のインデックス付き、最初の出現順）
fn group_by_directory(registry: &ManagedRepoRegistry) -> Vec<Vec<(usize, ManagedRepoEntry)>> {
    let mut groups: Vec<Vec<(usize, ManagedRepoEntry)>> = Vec::new();
    let mut group_of: HashMap<&str, usize> = HashMap::new();

    for (index, entry) in registry.iter().enumerate() {
        match group_of.get(entry.local_dir()) {
            Some(&group) => groups[group].push((index, entry.clone())),
            None => {
                group_of.insert(entry.local_dir(), groups.len());
                groups.push(vec![(index, entry.clone())]);
            }
        }
    }
    groups
}
