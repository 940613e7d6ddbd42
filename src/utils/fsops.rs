//! Staging-directory primitives

use crate::error::{BackupError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Creates and removes directory trees inside a job's staging root.
///
/// Stateless; every call hits the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStager;

impl FileStager {
    pub fn new() -> Self {
        Self
    }

    /// Create `path` and all missing ancestors. Succeeds silently if the
    /// directory already exists.
    pub fn ensure_dir(&self, path: &Path) -> Result<()> {
        debug!("Ensuring directory: {:?}", path);
        fs::create_dir_all(path).map_err(|source| BackupError::Filesystem {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Recursively delete `path` and everything under it. A missing path is
    /// a no-op, so removal stays safe after partial failures.
    pub fn remove_tree(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            debug!("Nothing to remove, path does not exist: {:?}", path);
            return Ok(());
        }

        debug!("Removing directory tree: {:?}", path);
        fs::remove_dir_all(path).map_err(|source| BackupError::Filesystem {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir_creates_ancestors() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b").join("c");

        FileStager::new().ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("staging");

        let stager = FileStager::new();
        stager.ensure_dir(&dir).unwrap();
        stager.ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_remove_tree_missing_path_is_noop() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("never-created");

        FileStager::new().remove_tree(&missing).unwrap();
    }

    #[test]
    fn test_remove_tree_deletes_contents() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("staging");
        std::fs::create_dir_all(dir.join("sub")).unwrap();
        std::fs::write(dir.join("sub").join("dump.sql"), "SELECT 1;").unwrap();

        FileStager::new().remove_tree(&dir).unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn test_ensure_dir_failure_carries_path() {
        let temp = TempDir::new().unwrap();
        // A file where a directory is expected blocks creation
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "not a dir").unwrap();

        let err = FileStager::new()
            .ensure_dir(&blocker.join("child"))
            .unwrap_err();
        match err {
            BackupError::Filesystem { path, .. } => {
                assert_eq!(path, blocker.join("child"));
            }
            other => panic!("expected Filesystem error, got {:?}", other),
        }
    }
}
