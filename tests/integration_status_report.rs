//! ステータスレポートの統合テスト（実際のgitリポジトリを使用）

mod common;

use common::test_fixtures::{commit_file, write_file, WorkspaceFixture};
use manage_repos::application::services::repository_inspector::RepositoryInspector;
use manage_repos::application::use_cases::status_check::{StatusCheckConfig, StatusCheckUseCase};
use manage_repos::application::use_cases::sync_repositories::{
    SyncRepositoriesConfig, SyncRepositoriesUseCase,
};
use manage_repos::domain::entities::managed_repo_registry::ManagedRepoRegistry;
use manage_repos::domain::entities::report_row::ReportValue;
use manage_repos::domain::entities::workspace::Workspace;
use manage_repos::domain::value_objects::progress::NoopObserver;
use manage_repos::infrastructure::git::Git2Backend;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn use_case(jobs: usize) -> StatusCheckUseCase {
    StatusCheckUseCase::new(
        StatusCheckConfig::default().with_parallel_jobs(jobs),
        Arc::new(RepositoryInspector::offline()),
        Arc::new(NoopObserver),
    )
}

#[tokio::test]
async fn test_report_has_one_row_per_directory_in_listing_order() {
    let fixture = WorkspaceFixture::new();
    fixture.create_repo("clean");
    let dirty = fixture.create_repo("Dirty");
    fixture.create_plain_dir("downloads");
    write_file(&dirty, "README.md", "changed\n");
    write_file(&dirty, "scratch.txt", "x");

    let registry = Arc::new(
        ManagedRepoRegistry::from_lines(["clean,https://example.com/clean", "tool,https://example.com/tool"])
            .unwrap(),
    );
    let workspace = Arc::new(Workspace::new(fixture.tool_dir()));

    for jobs in [1, 4] {
        let report = use_case(jobs)
            .execute(registry.clone(), workspace.clone())
            .await
            .unwrap();

        let names: Vec<&str> = report.rows.iter().map(|r| r.dir_name.as_str()).collect();
        assert_eq!(names, vec!["clean", "Dirty", "downloads", "tool"]);

        let summaries: Vec<String> = report.rows.iter().map(|r| r.summary.to_string()).collect();
        assert_eq!(summaries, vec!["M...-", "..UD-", ".N...", ".N..."]);

        assert_eq!(report.rows[1].modified(), ReportValue::Value(1));
        assert_eq!(report.rows[1].untracked(), ReportValue::Value(1));
        assert_eq!(report.rows[2].modified(), ReportValue::NotApplicable);
        assert_eq!(report.counts.total, 4);
    }
}

#[tokio::test]
async fn test_sync_then_report_compares_with_origin() {
    let fixture = WorkspaceFixture::new();
    let (remote, url) = fixture.create_remote("upstream");

    let registry = Arc::new(ManagedRepoRegistry::from_lines([format!("upstream,{url}")]).unwrap());
    let workspace = Arc::new(Workspace::new(fixture.tool_dir()));

    let sync = SyncRepositoriesUseCase::new(
        SyncRepositoriesConfig::default(),
        Arc::new(Git2Backend::new()),
        Arc::new(NoopObserver),
    )
    .execute(registry.clone(), workspace.clone())
    .await;
    assert!(sync.is_success());
    assert_eq!(sync.cloned_count(), 1);

    // Remote moves on; a fetching inspection sees the clone as behind
    commit_file(&remote, "CHANGELOG.md", "v2\n", 1_700_000_600);
    let inspecting = StatusCheckUseCase::new(
        StatusCheckConfig::default(),
        Arc::new(RepositoryInspector::default()),
        Arc::new(NoopObserver),
    );
    let report = inspecting.execute(registry, workspace).await.unwrap();

    let row = report
        .rows
        .iter()
        .find(|r| r.dir_name == "upstream")
        .unwrap();
    assert_eq!(row.summary.to_string(), "M...<");
}
