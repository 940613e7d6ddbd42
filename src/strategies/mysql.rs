//! MySQL dump strategy

use super::DumpStrategy;
use crate::config::DatabaseConfig;
use std::path::Path;

/// Builds a `mysqldump` command line writing `<database>.sql` into the
/// staging directory
#[derive(Debug, Clone)]
pub struct MysqlDump {
    pub database: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub extra_options: Vec<String>,
}

impl MysqlDump {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: None,
            extra_options: Vec::new(),
        }
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self {
            database: config.database.clone(),
            host: config.host.clone(),
            port: config.port.unwrap_or(3306),
            user: config.user.clone().unwrap_or_else(|| "root".to_string()),
            password: config.password.clone(),
            extra_options: config.extra_options.clone(),
        }
    }
}

impl DumpStrategy for MysqlDump {
    fn engine_path_segment(&self) -> &'static str {
        "mysql"
    }

    fn client_binary(&self) -> &'static str {
        "mysqldump"
    }

    fn build_dump_command(&self, data_path: &Path) -> String {
        let mut cmd = format!(
            "mysqldump --host={} --port={} --user={}",
            self.host, self.port, self.user
        );

        if let Some(ref password) = self.password {
            cmd.push_str(&format!(" --password={}", super::sh_quote(password)));
        }

        for option in &self.extra_options {
            cmd.push(' ');
            cmd.push_str(option);
        }

        let output = data_path.join(format!("{}.sql", self.database));
        cmd.push_str(&format!(" {} > '{}'", self.database, output.display()));
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_without_password() {
        let strategy = MysqlDump::new("app");
        let cmd = strategy.build_dump_command(Path::new("/backups/db_backups/mysql"));

        assert_eq!(
            cmd,
            "mysqldump --host=localhost --port=3306 --user=root app \
             > '/backups/db_backups/mysql/app.sql'"
        );
    }

    #[test]
    fn test_command_with_password_and_options() {
        let mut strategy = MysqlDump::new("app");
        strategy.password = Some("secret".to_string());
        strategy.extra_options = vec!["--single-transaction".to_string()];

        let cmd = strategy.build_dump_command(Path::new("/tmp/data"));
        assert!(cmd.contains("--password='secret'"));
        assert!(cmd.contains("--single-transaction"));
        assert!(cmd.ends_with("app > '/tmp/data/app.sql'"));
    }

    #[test]
    fn test_password_with_quote_and_space_is_shell_safe() {
        let mut strategy = MysqlDump::new("app");
        strategy.password = Some("it's secret".to_string());

        let cmd = strategy.build_dump_command(Path::new("/tmp/data"));
        assert!(cmd.contains(r"--password='it'\''s secret'"));
    }

    #[test]
    fn test_path_segment_and_binary() {
        let strategy = MysqlDump::new("app");
        assert_eq!(strategy.engine_path_segment(), "mysql");
        assert_eq!(strategy.client_binary(), "mysqldump");
    }
}
