use super::types::*;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Load and validate configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate the configuration
fn validate_config(config: &Config) -> Result<()> {
    if !config.global.backups_root.is_absolute() {
        return Err(ConfigError::ValidationError(format!(
            "backups_root must be an absolute path: {:?}",
            config.global.backups_root
        )));
    }

    // The staging tree is removed wholesale on cleanup; relocating
    // archives into it would destroy them
    let staging_tree = config.global.backups_root.join("db_backups");
    if config.global.archive_dir.starts_with(&staging_tree) {
        return Err(ConfigError::ValidationError(format!(
            "archive_dir must not be inside the staging tree {:?}",
            staging_tree
        )));
    }

    if config.databases.is_empty() {
        return Err(ConfigError::ValidationError(
            "No databases defined".to_string(),
        ));
    }

    for (name, database) in &config.databases {
        validate_database(name, database)?;
    }

    Ok(())
}

fn validate_database(name: &str, database: &DatabaseConfig) -> Result<()> {
    if database.database.is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "Database '{}': 'database' must not be empty",
            name
        )));
    }

    let prefix = effective_prefix(name, database);
    if prefix.is_empty() || prefix.contains('/') || prefix.contains(char::is_whitespace) {
        return Err(ConfigError::ValidationError(format!(
            "Database '{}': invalid archive prefix '{}' (must be non-empty, \
             without slashes or whitespace)",
            name, prefix
        )));
    }

    Ok(())
}

/// Archive prefix for a configured database (explicit prefix, or the
/// entry's key)
pub fn effective_prefix(name: &str, database: &DatabaseConfig) -> String {
    database
        .prefix
        .clone()
        .unwrap_or_else(|| name.to_string())
}
