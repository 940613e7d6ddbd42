//! PostgreSQL dump strategy

use super::DumpStrategy;
use crate::config::DatabaseConfig;
use std::path::Path;

/// Builds a `pg_dump` command line writing `<database>.sql` into the
/// staging directory. The password is passed through `PGPASSWORD` since
/// `pg_dump` does not take one on the command line.
#[derive(Debug, Clone)]
pub struct PostgresDump {
    pub database: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub extra_options: Vec<String>,
}

impl PostgresDump {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: None,
            extra_options: Vec::new(),
        }
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self {
            database: config.database.clone(),
            host: config.host.clone(),
            port: config.port.unwrap_or(5432),
            user: config
                .user
                .clone()
                .unwrap_or_else(|| "postgres".to_string()),
            password: config.password.clone(),
            extra_options: config.extra_options.clone(),
        }
    }
}

impl DumpStrategy for PostgresDump {
    fn engine_path_segment(&self) -> &'static str {
        "postgresql"
    }

    fn client_binary(&self) -> &'static str {
        "pg_dump"
    }

    fn build_dump_command(&self, data_path: &Path) -> String {
        let mut cmd = String::new();

        if let Some(ref password) = self.password {
            cmd.push_str(&format!("PGPASSWORD={} ", super::sh_quote(password)));
        }

        cmd.push_str(&format!(
            "pg_dump --host={} --port={} --username={}",
            self.host, self.port, self.user
        ));

        for option in &self.extra_options {
            cmd.push(' ');
            cmd.push_str(option);
        }

        let output = data_path.join(format!("{}.sql", self.database));
        cmd.push_str(&format!(
            " --file='{}' {}",
            output.display(),
            self.database
        ));
        cmd
    }
}
