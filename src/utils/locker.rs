//! File-based locking to serialize backup runs that share an archive prefix
//!
//! Archive names have second resolution, so two same-prefix runs started in
//! the same second would collide. Holding an exclusive lock per prefix for
//! the whole run rules that out for runs on one host.

use anyhow::{Context, Result};
use fd_lock::RwLock;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Lock guard for one backup run
pub struct JobLock {
    // Store the lock and its guard together
    _lock: Box<(RwLock<File>, Option<fd_lock::RwLockWriteGuard<'static, File>>)>,
    lock_path: PathBuf,
}

impl JobLock {
    /// Acquire an exclusive lock for an archive prefix.
    /// Returns an error if a run with the same prefix is already active.
    pub fn acquire(prefix: &str) -> Result<Self> {
        let lock_path = Self::lock_path(prefix);

        debug!("Attempting to acquire lock: {:?}", lock_path);

        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create lock directory")?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .context(format!("Failed to open lock file: {:?}", lock_path))?;

        let mut boxed_lock = Box::new((RwLock::new(file), None));

        // SAFETY: self-referential structure. The guard references the
        // RwLock stored in the same Box; the Box does not move, and the
        // tuple drop order drops the guard before the RwLock.
        let lock_ptr = &mut boxed_lock.0 as *mut RwLock<File>;
        let guard = unsafe { (*lock_ptr).try_write() }.context(format!(
            "A backup with prefix '{}' is already running (lock held)",
            prefix
        ))?;

        let static_guard: fd_lock::RwLockWriteGuard<'static, File> =
            unsafe { std::mem::transmute(guard) };
        boxed_lock.1 = Some(static_guard);

        info!("Acquired backup lock for prefix: {}", prefix);

        Ok(Self {
            _lock: boxed_lock,
            lock_path,
        })
    }

    fn lock_path(prefix: &str) -> PathBuf {
        #[cfg(unix)]
        let base = Path::new("/tmp");

        #[cfg(windows)]
        let base = std::env::temp_dir();

        base.join(format!("db-archiver-{}.lock", prefix))
    }

    /// Lock file path (for cleanup or inspection)
    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for JobLock {
    fn drop(&mut self) {
        info!("Released backup lock: {:?}", self.lock_path);

        // Removing the lock file is best effort
        if let Err(e) = std::fs::remove_file(&self.lock_path) {
            debug!("Failed to remove lock file: {}", e);
        }
    }
}
