//! End-to-end tests of the manage-repos binary

mod common;

use assert_cmd::Command;
use common::test_fixtures::{write_file, WorkspaceFixture};
use predicates::prelude::*;

fn manage_repos(fixture: &WorkspaceFixture) -> Command {
    let mut cmd = Command::cargo_bin("manage-repos").unwrap();
    cmd.current_dir(fixture.tool_dir())
        .env_remove("MANAGE_REPOS_CONFIG")
        .env_remove("MANAGE_REPOS_ROOT")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn test_missing_config_exits_cleanly_with_guidance() {
    let fixture = WorkspaceFixture::new();

    manage_repos(&fixture)
        .assert()
        .success()
        .stderr(predicate::str::contains("File 'config/repos.csv' not found in CWD"))
        .stderr(predicate::str::contains("copy/modify 'config/example.csv'"));
}

#[test]
fn test_malformed_config_is_an_error() {
    let fixture = WorkspaceFixture::new();
    fixture.write_repo_list("a,b,c\n");

    manage_repos(&fixture)
        .arg("list")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Invalid line 1"));
}

#[test]
fn test_list_prints_sorted_padded_entries() {
    let fixture = WorkspaceFixture::new();
    fixture.write_repo_list("notes,https://example.com/notes\n# comment\nB,https://example.com/b\na,https://example.com/a\n");

    manage_repos(&fixture)
        .arg("list")
        .assert()
        .success()
        .stdout(
            "a      https://example.com/a\nB      https://example.com/b\nnotes  https://example.com/notes\n",
        );
}

#[test]
fn test_status_table_offline() {
    let fixture = WorkspaceFixture::new();
    fixture.write_repo_list("clean,https://example.com/clean\n");
    fixture.create_repo("clean");
    let other = fixture.create_repo("other");
    write_file(&other, "new.txt", "x");
    fixture.create_plain_dir("downloads");

    manage_repos(&fixture)
        .args(["status", "--offline", "--no-clone", "--legend"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MRUDC  Local Directory"))
        .stdout(predicate::str::is_match(r"M\.\.\.-  clean").unwrap())
        .stdout(predicate::str::is_match(r"\.N\.\.\.  downloads").unwrap())
        .stdout(predicate::str::is_match(r"\.\.U\.-  other").unwrap())
        .stdout(predicate::str::contains("4 directories"));
}

#[test]
fn test_status_json_output() {
    let fixture = WorkspaceFixture::new();
    fixture.write_repo_list("missing,/nonexistent/remote\n");
    fixture.create_repo("present");

    let output = manage_repos(&fixture)
        .args(["--offline", "--no-clone", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = report["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["dir_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["present", "tool"]);
    assert_eq!(report["rows"][0]["managed"], false);
}

#[test]
fn test_sync_keep_going_reports_failures() {
    let fixture = WorkspaceFixture::new();
    let (_remote, url) = fixture.create_remote("lib");
    fixture.write_repo_list(&format!("broken,/nonexistent/remote\nlib,{url}\n"));

    manage_repos(&fixture)
        .args(["sync", "--keep-going"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 cloned"))
        .stdout(predicate::str::contains("Failed to clone 'broken'"));

    assert!(fixture.sibling("lib").join(".git").is_dir());
}
