//! db-archiver Library
//!
//! This library implements the lifecycle of a single database backup job:
//! staging a working directory, invoking a database-specific dump command,
//! packing the dump into a tar archive, and cleaning up transient state.

pub mod config;
pub mod error;
pub mod job;
pub mod managers;
pub mod strategies;
pub mod utils;

// Re-export commonly used types
pub use config::{load_config, Config, DatabaseConfig, Engine};
pub use error::BackupError;
pub use job::BackupJob;
pub use managers::backup::BackupManager;
pub use managers::logging::{init_console_logging, init_logging, LogGuard, LoggingConfig};
pub use strategies::{DumpStrategy, MongoDump, MysqlDump, PostgresDump};
pub use utils::{FileStager, ProcessRunner, ShellRunner};
