//! MongoDB dump strategy

use super::DumpStrategy;
use crate::config::DatabaseConfig;
use std::path::Path;

/// Builds a `mongodump` command line writing its BSON tree under the
/// staging directory via `--out`
#[derive(Debug, Clone)]
pub struct MongoDump {
    pub database: String,
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub extra_options: Vec<String>,
}

impl MongoDump {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            host: "localhost".to_string(),
            port: 27017,
            user: None,
            password: None,
            extra_options: Vec::new(),
        }
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self {
            database: config.database.clone(),
            host: config.host.clone(),
            port: config.port.unwrap_or(27017),
            user: config.user.clone(),
            password: config.password.clone(),
            extra_options: config.extra_options.clone(),
        }
    }
}

impl DumpStrategy for MongoDump {
    fn engine_path_segment(&self) -> &'static str {
        "mongodb"
    }

    fn client_binary(&self) -> &'static str {
        "mongodump"
    }

    fn build_dump_command(&self, data_path: &Path) -> String {
        let mut cmd = format!("mongodump --host={} --port={}", self.host, self.port);

        if let Some(ref user) = self.user {
            cmd.push_str(&format!(" --username={}", user));
        }
        if let Some(ref password) = self.password {
            cmd.push_str(&format!(" --password={}", super::sh_quote(password)));
        }

        cmd.push_str(&format!(" --db={}", self.database));

        for option in &self.extra_options {
            cmd.push(' ');
            cmd.push_str(option);
        }

        cmd.push_str(&format!(" --out='{}'", data_path.display()));
        cmd
    }
}
