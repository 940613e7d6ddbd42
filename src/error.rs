//! Error types shared by the backup lifecycle

use std::path::PathBuf;

/// Errors produced by the backup lifecycle and its filesystem/process
/// primitives. Every lifecycle operation either completes its state
/// transition or returns one of these untouched, leaving the job in its
/// prior state.
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    /// A directory could not be created or removed
    #[error("filesystem operation failed on {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A spawned command exited with a nonzero status; `stderr` is the
    /// tool's captured error output, verbatim
    #[error("command exited with status {code:?}: {stderr}")]
    Process { code: Option<i32>, stderr: String },

    /// The command never started
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A lifecycle operation was called out of order
    #[error("'{operation}' called while job is in state '{state}'")]
    OutOfOrder {
        operation: &'static str,
        state: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, BackupError>;
