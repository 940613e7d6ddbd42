use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub global: GlobalConfig,
    pub databases: HashMap<String, DatabaseConfig>,
}

/// Global configuration settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GlobalConfig {
    /// Root directory under which each job stages its dump and archive
    pub backups_root: PathBuf,

    /// Directory where finished archives are moved after a run
    pub archive_dir: PathBuf,

    /// Extra dump attempts after a failed one (the staging directory is
    /// reused; the dump command simply runs again)
    #[serde(default)]
    pub max_dump_retries: u32,

    /// Logging configuration
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_max_files")]
    pub log_max_files: u32,
    #[serde(default = "default_log_max_size_mb")]
    pub log_max_size_mb: u64,
}

/// Supported database engines
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Mysql,
    Postgresql,
    Mongodb,
}

/// One database to back up
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    pub engine: Engine,

    /// Name of the database to dump
    pub database: String,

    /// Archive file prefix (defaults to the entry's key)
    #[serde(default)]
    pub prefix: Option<String>,

    #[serde(default = "default_host")]
    pub host: String,

    /// Engine default port when unset
    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Extra flags appended to the dump command
    #[serde(default)]
    pub extra_options: Vec<String>,

    #[serde(default)]
    pub description: String,
}

// Default value functions

fn default_log_directory() -> PathBuf {
    PathBuf::from("~/logs")
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_max_files() -> u32 {
    10
}
fn default_log_max_size_mb() -> u64 {
    10
}
fn default_enabled() -> bool {
    true
}
fn default_host() -> String {
    "localhost".to_string()
}
