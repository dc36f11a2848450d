//! Error types for the benchmark engine
//!
//! Validation errors (`InvalidDirectory`, `MalformedFile`, `InvalidBound`,
//! `InvalidConfig`) are raised while a session is being built, before any I/O
//! is issued. `IoFailure` is raised by workers and is fatal for the session.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The filesystem call that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Open,
    Seek,
    Read,
    Stat,
    Create,
    Write,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IoOp::Open => "open",
            IoOp::Seek => "seek",
            IoOp::Read => "read",
            IoOp::Stat => "stat",
            IoOp::Create => "create",
            IoOp::Write => "write",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid data directory {}: {reason}", path.display())]
    InvalidDirectory { path: PathBuf, reason: String },

    #[error("{} has size {size}, which is not a multiple of the record size {record_size}", file.display())]
    MalformedFile {
        file: PathBuf,
        size: u64,
        record_size: u64,
    },

    #[error("invalid bound: {reason}")]
    InvalidBound { reason: String },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("{op} failed on {} (os error {code})", file.display())]
    IoFailure {
        op: IoOp,
        file: PathBuf,
        code: i32,
        #[source]
        source: io::Error,
    },

    #[error("statistics error: {reason}")]
    Statistics { reason: String },

    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },
}

impl BenchError {
    /// Wrap an `io::Error` raised by `op` on `file`
    pub fn io(op: IoOp, file: impl Into<PathBuf>, source: io::Error) -> Self {
        BenchError::IoFailure {
            op,
            file: file.into(),
            code: source.raw_os_error().unwrap_or(0),
            source,
        }
    }

    pub fn invalid_bound(reason: impl Into<String>) -> Self {
        BenchError::InvalidBound {
            reason: reason.into(),
        }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        BenchError::InvalidConfig {
            reason: reason.into(),
        }
    }
}
