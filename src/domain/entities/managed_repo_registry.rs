use super::managed_repo::{ManagedRepoEntry, ManagedRepoError};
use super::workspace::Workspace;
use crate::domain::value_objects::progress::{EntryOutcome, Pass, ProgressObserver};
use crate::infrastructure::git::{GitRepositoryError, RepositoryBackend};
use std::io::BufRead;
use thiserror::Error;
use tracing::{debug, warn};

/// 管理対象リストの読み込み・同期エラー
#[derive(Debug, Error)]
pub enum RegistryError {
    /// リストファイルを読めない
    #[error("{message}: {source}")]
    Config {
        /// 状況の説明
        message: String,
        /// 元のIOエラー
        #[source]
        source: std::io::Error,
    },

    /// 不正な行
    #[error("Invalid line {line_number} '{line}': {source}")]
    Parse {
        /// 1始まりの行番号
        line_number: usize,
        /// トリム後の行内容
        line: String,
        /// 解析エラー
        #[source]
        source: ManagedRepoError,
    },

    /// クローンに失敗した
    #[error("Failed to clone '{}' from {}: {cause}", .entry.local_dir(), .entry.remote_url())]
    Clone {
        /// 対象エントリ
        entry: ManagedRepoEntry,
        /// gitのエラー
        #[source]
        cause: GitRepositoryError,
    },

    /// フェッチに失敗した
    #[error("Failed to fetch '{}': {cause}", .entry.local_dir())]
    Fetch {
        /// 対象エントリ
        entry: ManagedRepoEntry,
        /// gitのエラー
        #[source]
        cause: GitRepositoryError,
    },
}

impl RegistryError {
    /// 同期処理の対象エントリ（Clone/Fetchのみ）
    pub fn entry(&self) -> Option<&ManagedRepoEntry> {
        match self {
            RegistryError::Clone { entry, .. } | RegistryError::Fetch { entry, .. } => Some(entry),
            _ => None,
        }
    }
}

/// 1エントリ分の同期処理
pub type EntryStep =
    fn(&ManagedRepoEntry, &dyn RepositoryBackend, &Workspace) -> Result<EntryOutcome, RegistryError>;

/// 1パス分の処理結果
#[derive(Debug)]
pub struct PassSummary {
    /// 対象パス
    pub pass: Pass,

    /// 処理したエントリと結果（レジストリ順）
    pub outcomes: Vec<(String, EntryOutcome)>,

    /// 無視されたエラー（`ignore_errors` 時のみ）
    pub failures: Vec<RegistryError>,
}

impl PassSummary {
    /// 空のサマリーを作成
    pub fn new(pass: Pass) -> Self {
        Self {
            pass,
            outcomes: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// 指定結果の件数
    pub fn count(&self, outcome: EntryOutcome) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == outcome).count()
    }

    /// 失敗がないか
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 管理対象リポジトリの一覧（設定ファイルの記載順）
///
/// 読み込み後は不変。同期処理はファイルシステムに副作用を持つが、
/// メモリ上のエントリは変更しない。
#[derive(Debug, Clone, Default)]
pub struct ManagedRepoRegistry {
    entries: Vec<ManagedRepoEntry>,
}

impl ManagedRepoRegistry {
    /// エントリ一覧からレジストリを作成
    pub fn new(entries: Vec<ManagedRepoEntry>) -> Self {
        Self { entries }
    }

    /// 行の並びからレジストリを作成
    ///
    /// 空行と `#` で始まる行は無視する。1行でも不正ならロード全体が失敗する。
    pub fn from_lines<I, S>(lines: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();

        for (index, raw) in lines.into_iter().enumerate() {
            let line = raw.as_ref().trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let entry = ManagedRepoEntry::parse(line).map_err(|source| RegistryError::Parse {
                line_number: index + 1,
                line: line.to_string(),
                source,
            })?;
            entries.push(entry);
        }

        debug!("Loaded {} managed repositories", entries.len());
        Ok(Self { entries })
    }

    /// リーダーからレジストリを読み込み
    pub fn load<R: BufRead>(reader: R) -> Result<Self, RegistryError> {
        let lines = reader
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| RegistryError::Config {
                message: "Failed to read managed repository list".to_string(),
                source,
            })?;
        Self::from_lines(lines)
    }

    /// エントリ数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 空か
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// エントリを記載順に走査
    pub fn iter(&self) -> std::slice::Iter<'_, ManagedRepoEntry> {
        self.entries.iter()
    }

    /// エントリのスライス
    pub fn entries(&self) -> &[ManagedRepoEntry] {
        &self.entries
    }

    /// ディレクトリ名の最大文字数（表示の桁揃え用、空なら0）
    pub fn max_name_len(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| entry.local_dir().chars().count())
            .max()
            .unwrap_or(0)
    }

    /// 指定ディレクトリ名が管理対象か（大文字小文字を区別）
    pub fn is_managed(&self, dir_name: &str) -> bool {
        self.find(dir_name).is_some()
    }

    /// 指定ディレクトリ名に最初に一致するエントリ
    pub fn find(&self, dir_name: &str) -> Option<&ManagedRepoEntry> {
        self.entries.iter().find(|entry| entry.local_dir() == dir_name)
    }

    /// エントリの順序でソートした一覧
    pub fn sorted(&self) -> Vec<&ManagedRepoEntry> {
        let mut entries: Vec<&ManagedRepoEntry> = self.entries.iter().collect();
        entries.sort();
        entries
    }

    /// ローカルに存在しないエントリをクローン
    ///
    /// `ignore_errors` が false の場合、最初の失敗でパス全体を中断する。
    pub fn sync_missing(
        &self,
        backend: &dyn RepositoryBackend,
        workspace: &Workspace,
        ignore_errors: bool,
        observer: &dyn ProgressObserver,
    ) -> Result<PassSummary, RegistryError> {
        self.run_pass(
            Pass::Clone,
            backend,
            workspace,
            ignore_errors,
            observer,
            Self::clone_entry,
        )
    }

    /// ローカルに存在するエントリの全リモートをフェッチ
    ///
    /// 作業コピーの内容は変更しない（リモート追跡参照のみ更新）。
    pub fn refresh_remotes(
        &self,
        backend: &dyn RepositoryBackend,
        workspace: &Workspace,
        ignore_errors: bool,
        observer: &dyn ProgressObserver,
    ) -> Result<PassSummary, RegistryError> {
        self.run_pass(
            Pass::Fetch,
            backend,
            workspace,
            ignore_errors,
            observer,
            Self::refresh_entry,
        )
    }

    /// 1エントリ分のクローン処理
    pub fn clone_entry(
        entry: &ManagedRepoEntry,
        backend: &dyn RepositoryBackend,
        workspace: &Workspace,
    ) -> Result<EntryOutcome, RegistryError> {
        let target = workspace.repo_path(entry.local_dir());
        if target.is_dir() {
            return Ok(EntryOutcome::AlreadyPresent);
        }

        backend
            .clone_repository(entry.remote_url(), &target)
            .map_err(|cause| RegistryError::Clone {
                entry: entry.clone(),
                cause,
            })?;
        Ok(EntryOutcome::Cloned)
    }

    /// 1エントリ分のフェッチ処理
    pub fn refresh_entry(
        entry: &ManagedRepoEntry,
        backend: &dyn RepositoryBackend,
        workspace: &Workspace,
    ) -> Result<EntryOutcome, RegistryError> {
        let target = workspace.repo_path(entry.local_dir());
        if !backend.is_working_copy(&target) {
            return Ok(EntryOutcome::NotPresent);
        }

        backend
            .fetch_all_remotes(&target)
            .map_err(|cause| RegistryError::Fetch {
                entry: entry.clone(),
                cause,
            })?;
        Ok(EntryOutcome::Fetched)
    }

    fn run_pass(
        &self,
        pass: Pass,
        backend: &dyn RepositoryBackend,
        workspace: &Workspace,
        ignore_errors: bool,
        observer: &dyn ProgressObserver,
        step: EntryStep,
    ) -> Result<PassSummary, RegistryError> {
        let mut summary = PassSummary::new(pass);
        observer.pass_started(pass, self.entries.len());

        for entry in &self.entries {
            let name = entry.local_dir();
            observer.entry_started(pass, name);

            match step(entry, backend, workspace) {
                Ok(outcome) => {
                    observer.entry_finished(pass, name, outcome);
                    summary.outcomes.push((name.to_string(), outcome));
                }
                Err(e) => {
                    observer.entry_finished(pass, name, EntryOutcome::Failed);
                    if !ignore_errors {
                        observer.pass_finished(pass);
                        return Err(e);
                    }
                    warn!("{} pass: ignoring error: {}", pass, e);
                    summary.outcomes.push((name.to_string(), EntryOutcome::Failed));
                    summary.failures.push(e);
                }
            }
        }

        observer.pass_finished(pass);
        Ok(summary)
    }
}

impl<'a> IntoIterator for &'a ManagedRepoRegistry {
    type Item = &'a ManagedRepoEntry;
    type IntoIter = std::slice::Iter<'a, ManagedRepoEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
