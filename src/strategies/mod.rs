pub mod mongodb;
pub mod mysql;
pub mod postgres;

use crate::config::DatabaseConfig;
use crate::config::Engine;
use std::path::Path;

pub use mongodb::MongoDump;
pub use mysql::MysqlDump;
pub use postgres::PostgresDump;

/// Trait for engine-specific dump command builders.
///
/// Implementations only format command lines; they must write everything
/// inside the supplied data path and never touch the directory tree
/// themselves. Directory lifecycle belongs to the job.
pub trait DumpStrategy: Send + Sync {
    /// Path segment unique to the engine, appended under the job's base
    /// path to form the staging directory
    fn engine_path_segment(&self) -> &'static str;

    /// Full shell command line that dumps the engine's data into
    /// `data_path` when executed
    fn build_dump_command(&self, data_path: &Path) -> String;

    /// Name of the external client binary the dump command invokes
    /// (for preflight checks)
    fn client_binary(&self) -> &'static str;
}

/// Build the strategy for a configured database
pub fn strategy_for(config: &DatabaseConfig) -> Box<dyn DumpStrategy> {
    match config.engine {
        Engine::Mysql => Box::new(MysqlDump::from_config(config)),
        Engine::Postgresql => Box::new(PostgresDump::from_config(config)),
        Engine::Mongodb => Box::new(MongoDump::from_config(config)),
    }
}

/// Single-quote a value for safe inclusion in a shell command line.
/// Embedded quotes become `'\''`.
pub(crate) fn sh_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
