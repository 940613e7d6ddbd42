//! Backup manager - drives backup jobs for configured databases
//!
//! This is the policy layer around the core job lifecycle: locking, client
//! preflight, bounded dump retries, archive relocation, and teardown all
//! live here, never in `BackupJob` itself.

use crate::config::{effective_prefix, Config, DatabaseConfig};
use crate::job::BackupJob;
use crate::strategies::strategy_for;
use crate::utils::locker::JobLock;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub struct BackupManager {
    config: Config,
    /// Keep the raw dump directory after a successful archive
    keep_raw: bool,
}

impl BackupManager {
    /// Create new backup manager
    pub fn new(config: Config, keep_raw: bool) -> Self {
        Self { config, keep_raw }
    }

    /// Run a backup for a specific configured database. Returns the final
    /// archive path under `archive_dir`, or `None` if the entry is
    /// disabled.
    pub fn backup_database(&self, name: &str) -> Result<Option<PathBuf>> {
        let database = self
            .config
            .databases
            .get(name)
            .context(format!("Database not found: {}", name))?;

        if !database.enabled {
            info!("Database '{}' is disabled, skipping", name);
            return Ok(None);
        }

        let prefix = effective_prefix(name, database);

        // Archive names have second resolution; one run per prefix at a time
        let _lock = JobLock::acquire(&prefix)
            .context(format!("Failed to acquire lock for database '{}'", name))?;

        info!("Starting backup for database: {}", name);
        let archive = self.run_job(name, database, &prefix)?;

        info!(
            "Backup for database '{}' completed, archive at {:?}",
            name, archive
        );
        Ok(Some(archive))
    }

    /// Drive one job through its whole lifecycle
    fn run_job(&self, name: &str, database: &DatabaseConfig, prefix: &str) -> Result<PathBuf> {
        let strategy = strategy_for(database);

        // Preflight: fail before staging anything if the client is missing
        let binary = strategy.client_binary();
        which::which(binary).context(format!(
            "Dump client '{}' not found in PATH (needed for database '{}')",
            binary, name
        ))?;

        let mut job = BackupJob::new(prefix, &self.config.global.backups_root, strategy);

        job.prepare()
            .context(format!("Failed to prepare staging for '{}'", name))?;

        if let Err(e) = self.dump_with_retries(&mut job, name) {
            // Release partial staging state; the dump error is the one worth
            // surfacing
            if let Err(cleanup_err) = job.cleanup() {
                warn!("Cleanup after failed dump also failed: {}", cleanup_err);
            }
            return Err(e);
        }

        if let Err(e) = job.compress() {
            if let Err(cleanup_err) = job.cleanup() {
                warn!("Cleanup after failed compression also failed: {}", cleanup_err);
            }
            return Err(e).context(format!("Failed to archive dump for '{}'", name));
        }

        let archive = job
            .archive_path()
            .context("Archive path missing after successful compression")?
            .to_path_buf();

        if !self.keep_raw {
            // Drop the uncompressed copy early; the archive stays intact
            job.remove_data_path()
                .context("Failed to remove raw dump data")?;
        }

        let relocated = relocate_archive(&archive, &self.config.global.archive_dir)
            .context(format!("Failed to relocate archive {:?}", archive))?;

        if self.keep_raw {
            info!(
                "Keeping raw dump at {:?} (--keep-raw)",
                job.data_path().unwrap_or_else(|| Path::new("?"))
            );
        } else {
            job.cleanup()
                .context(format!("Failed to clean up staging for '{}'", name))?;
        }

        Ok(relocated)
    }

    /// Run the dump stage, retrying up to the configured bound.
    ///
    /// A failed dump leaves the job prepared, so retrying is just calling
    /// `dump` again; the staging directory is reused.
    fn dump_with_retries(&self, job: &mut BackupJob, name: &str) -> Result<()> {
        let attempts = 1 + self.config.global.max_dump_retries;

        for attempt in 1..=attempts {
            match job.dump() {
                Ok(()) => return Ok(()),
                Err(e) if attempt < attempts => {
                    warn!(
                        "Dump attempt {}/{} for '{}' failed: {}",
                        attempt, attempts, name, e
                    );
                }
                Err(e) => {
                    return Err(e).context(format!(
                        "Dump failed for '{}' after {} attempt(s)",
                        name, attempts
                    ));
                }
            }
        }

        unreachable!("dump retry loop always returns")
    }

    /// Run backups for all enabled databases
    pub fn backup_all(&self) -> Result<()> {
        let mut names: Vec<_> = self
            .config
            .databases
            .iter()
            .filter(|(_, database)| database.enabled)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();

        if names.is_empty() {
            warn!("No enabled databases to back up");
            return Ok(());
        }

        info!("Found {} enabled databases", names.len());

        let mut success_count = 0;
        let mut failure_count = 0;
        let mut errors = Vec::new();

        for name in &names {
            match self.backup_database(name) {
                Ok(_) => {
                    success_count += 1;
                }
                Err(e) => {
                    failure_count += 1;
                    errors.push(format!("{}: {}", name, e));
                    error!("Failed to back up database '{}': {}", name, e);
                }
            }
        }

        info!(
            "Backup summary: {} succeeded, {} failed",
            success_count, failure_count
        );

        if failure_count > 0 {
            anyhow::bail!(
                "{} database(s) failed to back up:\n{}",
                failure_count,
                errors.join("\n")
            );
        }

        Ok(())
    }

    /// Get list of all configured database names
    pub fn list_databases(&self) -> Vec<String> {
        let mut names: Vec<_> = self.config.databases.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Move a finished archive into the archive directory. Falls back to
/// copy-and-remove when rename crosses a filesystem boundary.
fn relocate_archive(archive: &Path, archive_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(archive_dir)
        .context(format!("Failed to create archive directory: {:?}", archive_dir))?;

    let file_name = archive
        .file_name()
        .context("Archive path has no file name")?;
    let destination = archive_dir.join(file_name);

    if fs::rename(archive, &destination).is_err() {
        fs::copy(archive, &destination)
            .context(format!("Failed to copy archive to {:?}", destination))?;
        fs::remove_file(archive)
            .context(format!("Failed to remove original archive {:?}", archive))?;
    }

    info!("Relocated archive to {:?}", destination);
    Ok(destination)
}
