//! Utility modules

pub mod command;
pub mod fsops;
pub mod locker;

pub use command::{ProcessRunner, ShellRunner};
pub use fsops::FileStager;
pub use locker::JobLock;
