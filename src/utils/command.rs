//! Process execution abstraction
//!
//! One synchronous, blocking invocation per call is the full contract:
//! no retry, no timeout, no output streaming. Retry policy belongs to the
//! caller. The trait seam exists so the job orchestrator can be exercised
//! in tests without spawning real processes.

use crate::error::{BackupError, Result};
use std::process::{Command, Stdio};
use tracing::{debug, error};

/// Executes one external command and translates its outcome into the
/// backup error model.
pub trait ProcessRunner: Send + Sync {
    /// Run a program with arguments, waiting for completion
    fn run(&self, program: &str, args: &[&str]) -> Result<()>;

    /// Run a full command line through the system shell (dump commands use
    /// redirects and env prefixes, so they need a shell)
    fn run_shell(&self, command: &str) -> Result<()> {
        #[cfg(unix)]
        let (shell, flag) = ("sh", "-c");

        #[cfg(windows)]
        let (shell, flag) = ("cmd", "/C");

        self.run(shell, &[flag, command])
    }
}

/// Default implementation using real subprocess calls
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for ShellRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<()> {
        debug!("Running command: {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| BackupError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            error!("Command failed: {} {}", program, args.join(" "));
            error!("Stderr: {}", stderr);
            return Err(BackupError::Process {
                code: output.status.code(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.is_empty() {
            debug!("Command output: {}", stdout);
        }

        Ok(())
    }
}

/// A recording runner for tests: captures every invocation and returns
/// configured responses. Available to external test crates.
#[allow(dead_code)]
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// One recorded invocation
    #[derive(Clone, Debug)]
    pub struct RecordedCommand {
        pub program: String,
        pub args: Vec<String>,
    }

    impl RecordedCommand {
        /// The shell command line, for invocations made via `run_shell`
        pub fn shell_line(&self) -> Option<&str> {
            (self.program == "sh" && self.args.len() == 2 && self.args[0] == "-c")
                .then(|| self.args[1].as_str())
        }
    }

    #[derive(Clone, Debug)]
    pub enum MockOutcome {
        Success,
        Failure { code: Option<i32>, stderr: String },
    }

    /// Runner that records calls and replays queued outcomes (oldest
    /// first; an empty queue means success)
    #[derive(Clone, Default)]
    pub struct MockRunner {
        pub calls: Arc<Mutex<Vec<RecordedCommand>>>,
        outcomes: Arc<Mutex<Vec<MockOutcome>>>,
    }

    impl MockRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue an outcome for the next unanswered invocation
        pub fn push_outcome(&self, outcome: MockOutcome) {
            self.outcomes.lock().unwrap().push(outcome);
        }

        pub fn failing(code: i32, stderr: &str) -> Self {
            let runner = Self::new();
            runner.push_outcome(MockOutcome::Failure {
                code: Some(code),
                stderr: stderr.to_string(),
            });
            runner
        }

        pub fn recorded(&self) -> Vec<RecordedCommand> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ProcessRunner for MockRunner {
        fn run(&self, program: &str, args: &[&str]) -> Result<()> {
            self.calls.lock().unwrap().push(RecordedCommand {
                program: program.to_string(),
                args: args.iter().map(|s| s.to_string()).collect(),
            });

            let mut outcomes = self.outcomes.lock().unwrap();
            match if outcomes.is_empty() {
                MockOutcome::Success
            } else {
                outcomes.remove(0)
            } {
                MockOutcome::Success => Ok(()),
                MockOutcome::Failure { code, stderr } => {
                    Err(BackupError::Process { code, stderr })
                }
            }
        }
    }
}
