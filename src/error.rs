//! Error types for Skitter.
//!
//! Uses `thiserror` for ergonomic error definitions. Per-attempt network
//! failures are not errors at this level: the probe turns them into
//! classified results (see [`crate::scanner::probe::ProbeError`]).

use crate::types::{PortError, TargetError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),

    #[error("invalid log level '{0}'")]
    InvalidLogLevel(String),
}

/// Misuse of the result channel's completion contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("task_done() called more times than items were pushed")]
    TooManyTaskDone,
}

/// Errors from turning command-line input into a scan job.
///
/// All of these are reported before any probe is launched.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Port(#[from] PortError),

    #[error(transparent)]
    Target(#[from] TargetError),
}

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
