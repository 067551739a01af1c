//! CLI integration tests using assert_cmd.

mod common;

use assert_cmd::Command;
use common::write_tagged_pdf;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[allow(deprecated)]
fn joiner() -> Command {
    let mut cmd = Command::cargo_bin("index-card-joiner").unwrap();
    cmd.env_remove("INDEX_JOINER_ROOT")
        .env_remove("INDEX_JOINER_PROJECT")
        .env_remove("INDEX_JOINER_PREFIX")
        .env_remove("INDEX_JOINER_SECONDARY_TARGET")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_options() {
    joiner().arg("--help").assert().success().stdout(
        predicate::str::contains("--root")
            .and(predicate::str::contains("--secondary-target"))
            .and(predicate::str::contains("--dry-run"))
            .and(predicate::str::contains("--force")),
    );
}

#[test]
fn missing_project_folder_fails() {
    let temp_dir = TempDir::new().unwrap();

    joiner()
        .arg("--root")
        .arg(temp_dir.path())
        .arg("--secondary-target")
        .arg(temp_dir.path().join("copies"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No project folder"));
}

#[test]
fn merges_project_and_reports_summary() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("root/UNQ0450 Project");
    write_tagged_pdf(&project.join("Card_01/a.pdf"), "a", 1);
    write_tagged_pdf(&project.join("Card_01/b.pdf"), "b", 1);
    let copies = temp_dir.path().join("copies");

    joiner()
        .arg("--root")
        .arg(temp_dir.path().join("root"))
        .arg("--secondary-target")
        .arg(&copies)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Card_01_UNQ0450_Project.pdf (2 pages)")
                .and(predicate::str::contains("UNQ0450 Project: 1 merged")),
        );

    assert!(copies
        .join("UNQ0450 Project/Card_01_UNQ0450_Project.pdf")
        .is_file());
}

#[test]
fn dry_run_leaves_tree_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("root/UNQ0450 Project");
    write_tagged_pdf(&project.join("Card_01/a.pdf"), "a", 3);

    joiner()
        .arg("--root")
        .arg(temp_dir.path().join("root"))
        .arg("--secondary-target")
        .arg(temp_dir.path().join("copies"))
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Would merge").and(predicate::str::contains("3 pages")));

    assert!(!project.join("Card_01_UNQ0450_Project.pdf").exists());
    assert!(!temp_dir.path().join("copies").exists());
}

#[test]
fn failed_folder_sets_exit_code() {
    let temp_dir = TempDir::new().unwrap();
    let project = temp_dir.path().join("root/UNQ0450 Project");
    fs::create_dir_all(project.join("Card_01")).unwrap();
    fs::write(project.join("Card_01/a.pdf"), b"garbage").unwrap();

    joiner()
        .arg("--root")
        .arg(temp_dir.path().join("root"))
        .arg("--secondary-target")
        .arg(temp_dir.path().join("copies"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed:"));
}
