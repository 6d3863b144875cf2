//! Error types for Provis
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::Stage;

/// Result type alias for Provis operations
pub type ProvisResult<T> = Result<T, ProvisError>;

/// Main error type for Provis operations
#[derive(Error, Debug)]
pub enum ProvisError {
    /// A stage's external command exited non-zero
    #[error("stage '{stage}' failed with {}", .code.map_or_else(|| "a signal".to_string(), |c| format!("exit code {c}")))]
    StageFailed { stage: Stage, code: Option<i32> },

    /// A stage's external command could not be launched at all
    #[error("stage '{stage}' could not launch '{program}': {source}")]
    StageSpawn {
        stage: Stage,
        program: String,
        #[source]
        source: io::Error,
    },

    /// Directory required by a stage does not exist
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Entering or restoring a working directory failed
    #[error("failed to change working directory to {path}: {source}")]
    Workdir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Another provisioning run holds the run lock
    #[error("another provisioning run is in progress (lock held at {path})")]
    LockHeld { path: PathBuf },

    /// Configuration file exists but could not be parsed
    #[error("invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ProvisError {
    /// Process exit code for this error.
    ///
    /// A failed stage propagates the child's own exit code; everything else
    /// (signal death, spawn failures, lock contention) maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProvisError::StageFailed { code, .. } => code.filter(|c| *c != 0).unwrap_or(1),
            _ => 1,
        }
    }
}
