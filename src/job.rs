//! Backup job lifecycle
//!
//! One `BackupJob` drives a single backup run through a fixed sequence:
//! prepare the staging tree, run the engine's dump command, pack the dump
//! into a tar archive, tear the staging tree down. The engine-specific dump
//! command comes from a [`DumpStrategy`]; everything else is fixed here.
//!
//! The lifecycle is an explicit forward-only state machine. Each operation
//! either completes its transition or returns the error untouched with the
//! job still in its prior state, so retry and abort policy stay with the
//! caller.

use crate::error::{BackupError, Result};
use crate::strategies::DumpStrategy;
use crate::utils::command::{ProcessRunner, ShellRunner};
use crate::utils::fsops::FileStager;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Fixed directory segment under the backups root holding all staging state
const DB_BACKUPS_SEGMENT: &str = "db_backups";

/// Directory segment under the base path holding finished archives
const COMPRESSED_SEGMENT: &str = "dbcompressed";

/// Archive timestamp format, second resolution
const TIMESTAMP_FORMAT: &str = "%Y_%m_%d-%H_%M_%S";

/// Paths computed by `prepare` and threaded through the later stages
#[derive(Debug, Clone)]
struct StagedPaths {
    base_path: PathBuf,
    data_path: PathBuf,
}

#[derive(Debug, Clone)]
enum JobState {
    Created,
    Prepared(StagedPaths),
    Dumped(StagedPaths),
    Compressed {
        staged: StagedPaths,
        compressed_dir: PathBuf,
        archive_path: PathBuf,
    },
    CleanedUp,
}

impl JobState {
    fn name(&self) -> &'static str {
        match self {
            JobState::Created => "created",
            JobState::Prepared(_) => "prepared",
            JobState::Dumped(_) => "dumped",
            JobState::Compressed { .. } => "compressed",
            JobState::CleanedUp => "cleaned-up",
        }
    }
}

/// Orchestrates one backup run: stage, dump, archive, clean up.
///
/// Create one job per run; a job is not reusable after `cleanup`.
pub struct BackupJob<R: ProcessRunner = ShellRunner> {
    file_prefix: String,
    backups_root: PathBuf,
    strategy: Box<dyn DumpStrategy>,
    runner: R,
    stager: FileStager,
    state: JobState,
}

impl BackupJob<ShellRunner> {
    /// Create a job that spawns real subprocesses
    pub fn new(
        file_prefix: impl Into<String>,
        backups_root: impl Into<PathBuf>,
        strategy: Box<dyn DumpStrategy>,
    ) -> Self {
        Self::with_runner(file_prefix, backups_root, strategy, ShellRunner::new())
    }
}

impl<R: ProcessRunner> BackupJob<R> {
    /// Create a job with an injected process runner (used by tests)
    pub fn with_runner(
        file_prefix: impl Into<String>,
        backups_root: impl Into<PathBuf>,
        strategy: Box<dyn DumpStrategy>,
        runner: R,
    ) -> Self {
        Self {
            file_prefix: file_prefix.into(),
            backups_root: backups_root.into(),
            strategy,
            runner,
            stager: FileStager::new(),
            state: JobState::Created,
        }
    }

    /// Archive prefix this job was created with
    pub fn file_prefix(&self) -> &str {
        &self.file_prefix
    }

    /// Current lifecycle state, for logging and diagnostics
    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    /// Staging directory the dump writes into; `None` before `prepare`
    pub fn data_path(&self) -> Option<&Path> {
        match &self.state {
            JobState::Prepared(staged) | JobState::Dumped(staged) => Some(&staged.data_path),
            JobState::Compressed { staged, .. } => Some(&staged.data_path),
            _ => None,
        }
    }

    /// Path of the finished archive; `None` until `compress` succeeds
    pub fn archive_path(&self) -> Option<&Path> {
        match &self.state {
            JobState::Compressed { archive_path, .. } => Some(archive_path),
            _ => None,
        }
    }

    /// Compute the staging paths and create the data directory.
    ///
    /// Transitions `created → prepared`. On failure the job stays in
    /// `created` and no paths are retained.
    pub fn prepare(&mut self) -> Result<()> {
        if !matches!(self.state, JobState::Created) {
            return Err(self.out_of_order("prepare"));
        }

        let base_path = self.backups_root.join(DB_BACKUPS_SEGMENT);
        let data_path = base_path.join(self.strategy.engine_path_segment());

        self.stager.ensure_dir(&data_path)?;

        debug!("Prepared staging directory: {:?}", data_path);
        self.state = JobState::Prepared(StagedPaths {
            base_path,
            data_path,
        });
        Ok(())
    }

    /// Run the engine's dump command against the staging directory.
    ///
    /// Transitions `prepared → dumped`. On failure the underlying tool's
    /// error is returned unchanged and the job stays in `prepared`, so the
    /// caller may retry `dump` or abort and `cleanup`.
    pub fn dump(&mut self) -> Result<()> {
        let staged = match &self.state {
            JobState::Prepared(staged) => staged.clone(),
            _ => return Err(self.out_of_order("dump")),
        };

        let command = self.strategy.build_dump_command(&staged.data_path);
        info!(
            "Dumping '{}' into {:?}",
            self.strategy.engine_path_segment(),
            staged.data_path
        );

        self.runner.run_shell(&command)?;

        self.state = JobState::Dumped(staged);
        Ok(())
    }

    /// Pack everything under the staging directory into a single
    /// uncompressed tar archive named `<prefix>_<timestamp>.tar`.
    ///
    /// The archive is rooted at the staging directory, so member paths are
    /// relative to it. Transitions `dumped → compressed`; on failure the
    /// job stays in `dumped`.
    ///
    /// The timestamp has second resolution: two same-prefix jobs compressed
    /// in the same second collide on the archive name. Callers sharing a
    /// backups root must serialize such runs (the CLI does so with a
    /// per-prefix lock).
    pub fn compress(&mut self) -> Result<()> {
        let staged = match &self.state {
            JobState::Dumped(staged) => staged.clone(),
            _ => return Err(self.out_of_order("compress")),
        };

        let compressed_dir = staged.base_path.join(COMPRESSED_SEGMENT);
        let file_name = format!(
            "{}_{}.tar",
            self.file_prefix,
            chrono::Local::now().format(TIMESTAMP_FORMAT)
        );
        let archive_path = compressed_dir.join(file_name);

        self.stager.ensure_dir(&compressed_dir)?;

        info!("Creating archive: {:?}", archive_path);
        let archive = archive_path.display().to_string();
        let data = staged.data_path.display().to_string();
        self.runner
            .run("tar", &["-cf", &archive, "-C", &data, "."])?;

        self.state = JobState::Compressed {
            staged,
            compressed_dir,
            archive_path,
        };
        Ok(())
    }

    /// Remove the whole staging tree, archive included.
    ///
    /// Callers who want to keep the archive must relocate it first, or call
    /// [`remove_data_path`](Self::remove_data_path) instead. Valid from any
    /// state at or after `prepared`, including after partial failures;
    /// removal itself is a no-op for paths that no longer exist.
    pub fn cleanup(&mut self) -> Result<()> {
        let (base_path, compressed_dir) = match &self.state {
            JobState::Prepared(staged) | JobState::Dumped(staged) => {
                (staged.base_path.clone(), None)
            }
            JobState::Compressed {
                staged,
                compressed_dir,
                ..
            } => (staged.base_path.clone(), Some(compressed_dir.clone())),
            _ => return Err(self.out_of_order("cleanup")),
        };

        info!("Cleaning up staging tree: {:?}", base_path);
        self.stager.remove_tree(&base_path)?;
        if let Some(dir) = compressed_dir {
            self.stager.remove_tree(&dir)?;
        }

        self.state = JobState::CleanedUp;
        Ok(())
    }

    /// Remove only the raw dump directory, preserving the archive.
    ///
    /// Orthogonal to the lifecycle: the job's state does not change, so it
    /// can run after `compress` to discard the uncompressed copy while the
    /// archive is still being relocated.
    pub fn remove_data_path(&mut self) -> Result<()> {
        let data_path = match &self.state {
            JobState::Prepared(staged) | JobState::Dumped(staged) => staged.data_path.clone(),
            JobState::Compressed { staged, .. } => staged.data_path.clone(),
            _ => return Err(self.out_of_order("remove_data_path")),
        };

        info!("Removing raw dump data: {:?}", data_path);
        self.stager.remove_tree(&data_path)
    }

    fn out_of_order(&self, operation: &'static str) -> BackupError {
        BackupError::OutOfOrder {
            operation,
            state: self.state.name(),
        }
    }
}
