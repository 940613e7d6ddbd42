// CLI surface tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn valid_config(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    // Logs go into the scratch dir, not whoever-runs-the-suite's home
    fs::write(
        &path,
        format!(
            r#"
[global]
backups_root = "/var/backups"
archive_dir = "/var/archives"
log_directory = "{}"

[databases.site]
engine = "mysql"
database = "site_production"
description = "Main site database"
"#,
            dir.path().join("logs").display()
        ),
    )
    .unwrap();
    path
}

#[test]
fn test_validate_accepts_valid_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = valid_config(&temp_dir);

    Command::cargo_bin("db-archiver")
        .unwrap()
        .args(["--config", &config.display().to_string(), "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid!"));
}

#[test]
fn test_validate_rejects_missing_config() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.toml");

    Command::cargo_bin("db-archiver")
        .unwrap()
        .args(["--config", &missing.display().to_string(), "validate"])
        .assert()
        .failure();
}

#[test]
fn test_list_shows_configured_databases() {
    let temp_dir = TempDir::new().unwrap();
    let config = valid_config(&temp_dir);

    Command::cargo_bin("db-archiver")
        .unwrap()
        .args(["--config", &config.display().to_string(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("site"))
        .stdout(predicate::str::contains("Main site database"));
}

#[test]
fn test_run_unknown_database_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = valid_config(&temp_dir);

    Command::cargo_bin("db-archiver")
        .unwrap()
        .args([
            "--config",
            &config.display().to_string(),
            "run",
            "--database",
            "nope",
        ])
        .assert()
        .failure();
}
