use serde::Serialize;
use std::path::{Path, PathBuf};

/// 管理対象リストファイルのデフォルト位置（作業ディレクトリからの相対パス）
pub const DEFAULT_REPO_LIST_FILE: &str = "config/repos.csv";

/// コピー元となるサンプルリストファイル
pub const EXAMPLE_REPO_LIST_FILE: &str = "config/example.csv";

/// リポジトリ群のルート（作業ディレクトリの親ディレクトリ）
pub const DEFAULT_REPOS_ROOT: &str = "..";

/// ワークスペースのファイルシステムレイアウト
///
/// 管理対象・発見対象のリポジトリはすべて `repos_root` 直下の兄弟ディレクトリとして置かれる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workspace {
    /// 作業ディレクトリ
    pub root_path: PathBuf,

    /// リポジトリ群を置くディレクトリ
    pub repos_root: PathBuf,

    /// 管理対象リストファイル
    pub repo_list_file: PathBuf,
}

impl Workspace {
    /// デフォルトのレイアウトで新しいWorkspaceを作成
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        let root_path = root_path.into();
        Self {
            repos_root: root_path.join(DEFAULT_REPOS_ROOT),
            repo_list_file: root_path.join(DEFAULT_REPO_LIST_FILE),
            root_path,
        }
    }

    /// リポジトリ群のルートを設定（相対パスは作業ディレクトリ基準）
    pub fn with_repos_root(mut self, repos_root: impl AsRef<Path>) -> Self {
        self.repos_root = self.resolve(repos_root.as_ref());
        self
    }

    /// 管理対象リストファイルを設定（相対パスは作業ディレクトリ基準）
    pub fn with_repo_list_file(mut self, repo_list_file: impl AsRef<Path>) -> Self {
        self.repo_list_file = self.resolve(repo_list_file.as_ref());
        self
    }

    /// 指定ディレクトリ名のリポジトリパス
    pub fn repo_path(&self, local_dir: &str) -> PathBuf {
        self.repos_root.join(local_dir)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_path.join(path)
        }
    }
}
