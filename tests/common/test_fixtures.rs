//! Test fixtures: temporary workspaces and git repositories

use git2::{Commit, Repository, Signature, Time};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary layout `<tmp>/tool` (working directory) with sibling repositories beside it
pub struct WorkspaceFixture {
    pub temp_dir: TempDir,
}

impl WorkspaceFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir_all(temp_dir.path().join("tool/config"))
            .expect("Failed to create tool directory");
        Self { temp_dir }
    }

    /// The tool's working directory
    pub fn tool_dir(&self) -> PathBuf {
        self.temp_dir.path().join("tool")
    }

    /// Path of a sibling directory
    pub fn sibling(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Write `config/repos.csv`
    pub fn write_repo_list(&self, content: &str) -> PathBuf {
        let path = self.tool_dir().join("config/repos.csv");
        std::fs::write(&path, content).expect("Failed to write repo list");
        path
    }

    /// Plain directory that is not a working copy
    pub fn create_plain_dir(&self, name: &str) -> PathBuf {
        let path = self.sibling(name);
        std::fs::create_dir_all(&path).expect("Failed to create directory");
        path
    }

    /// Sibling repository with one commit
    pub fn create_repo(&self, name: &str) -> Repository {
        let repo = Repository::init(self.sibling(name)).expect("Failed to init repository");
        commit_file(&repo, "README.md", "# test\n", 1_700_000_000);
        repo
    }

    /// Repository outside the sibling layout, usable as a clone source
    pub fn create_remote(&self, name: &str) -> (Repository, String) {
        let path = self.temp_dir.path().join("remotes").join(name);
        let repo = Repository::init(&path).expect("Failed to init remote");
        commit_file(&repo, "README.md", "# remote\n", 1_700_000_000);
        let url = path.to_string_lossy().to_string();
        (repo, url)
    }
}

/// Commit `content` as `name` on the current branch with a fixed timestamp
pub fn commit_file(repo: &Repository, name: &str, content: &str, secs: i64) {
    let workdir = repo.workdir().expect("Repository has no workdir");
    std::fs::write(workdir.join(name), content).expect("Failed to write file");

    let mut index = repo.index().expect("Failed to open index");
    index.add_path(Path::new(name)).expect("Failed to add path");
    index.write().expect("Failed to write index");
    let tree_id = index.write_tree().expect("Failed to write tree");
    let tree = repo.find_tree(tree_id).expect("Failed to find tree");

    let signature = Signature::new("Tester", "tester@example.com", &Time::new(secs, 0))
        .expect("Failed to create signature");
    let parents: Vec<Commit<'_>> = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().expect("Failed to peel HEAD")],
        Err(_) => vec![],
    };
    let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();
    repo.commit(Some("HEAD"), &signature, &signature, "commit", &tree, &parent_refs)
        .expect("Failed to commit");
}

/// Working directory file without staging it
pub fn write_file(repo: &Repository, name: &str, content: &str) {
    let workdir = repo.workdir().expect("Repository has no workdir");
    std::fs::write(workdir.join(name), content).expect("Failed to write file");
}
