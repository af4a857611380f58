//! Error types for the mediapress core library.

use std::process::ExitStatus;
use thiserror::Error;

/// Custom error types for mediapress
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("External tool '{0}' not found (checked environment and configured path)")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, std::io::Error),

    #[error("Failed waiting for command '{0}': {1}")]
    CommandWait(String, std::io::Error),

    #[error("Command '{cmd}' failed ({status}): {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("ffprobe output parse error: {0}")]
    FfprobeParse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid path: {0}")]
    PathError(String),

    #[error("Vault operation failed: {0}")]
    Vault(String),

    #[error("Unsupported media kind: {0}")]
    UnsupportedKind(String),
}

/// Result type for mediapress operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a `CommandStart` error for a command that could not be spawned.
pub fn command_start_error(cmd: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Builds a `CommandWait` error for a command whose exit could not be observed.
pub fn command_wait_error(cmd: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

/// Builds a `CommandFailed` error carrying the tool's own stderr payload.
pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.into(),
    }
}
