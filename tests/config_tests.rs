// Integration tests for configuration loading and validation

use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_full_config_loads() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        &temp_dir,
        r#"
[global]
backups_root = "/var/backups"
archive_dir = "/var/archives"
max_dump_retries = 2
log_level = "debug"

[databases.site]
engine = "mysql"
database = "site_production"
prefix = "host1"
host = "db.internal"
port = 3307
user = "backup"
password = "secret"
extra_options = ["--single-transaction"]
description = "Main site database"

[databases.events]
engine = "mongodb"
database = "events"
"#,
    );

    let config = db_archiver::config::load_config(&config_path).unwrap();
    assert_eq!(config.global.max_dump_retries, 2);
    assert_eq!(config.databases.len(), 2);

    let site = &config.databases["site"];
    assert_eq!(site.engine, db_archiver::Engine::Mysql);
    assert_eq!(site.port, Some(3307));
    assert_eq!(site.prefix.as_deref(), Some("host1"));

    // Defaults fill in for the sparse entry
    let events = &config.databases["events"];
    assert!(events.enabled);
    assert_eq!(events.host, "localhost");
    assert!(events.port.is_none());
}

#[test]
fn test_config_validation_no_databases() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        &temp_dir,
        r#"
[global]
backups_root = "/var/backups"
archive_dir = "/var/archives"
"#,
    );

    let result = db_archiver::config::load_config(&config_path);
    assert!(result.is_err());
}

#[test]
fn test_config_validation_relative_backups_root() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        &temp_dir,
        r#"
[global]
backups_root = "relative/backups"
archive_dir = "/var/archives"

[databases.site]
engine = "mysql"
database = "site"
"#,
    );

    let result = db_archiver::config::load_config(&config_path);
    assert!(result.is_err());
}

#[test]
fn test_config_validation_archive_dir_inside_staging() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        &temp_dir,
        r#"
[global]
backups_root = "/var/backups"
archive_dir = "/var/backups/db_backups/archives"

[databases.site]
engine = "mysql"
database = "site"
"#,
    );

    let result = db_archiver::config::load_config(&config_path);
    assert!(result.is_err());
}

#[test]
fn test_config_unknown_engine_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        &temp_dir,
        r#"
[global]
backups_root = "/var/backups"
archive_dir = "/var/archives"

[databases.site]
engine = "oracle"
database = "site"
"#,
    );

    let result = db_archiver::config::load_config(&config_path);
    assert!(result.is_err());
}

#[test]
fn test_config_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = db_archiver::config::load_config(temp_dir.path().join("nope.toml"));
    assert!(result.is_err());
}
