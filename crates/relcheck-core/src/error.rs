//! Error types for relcheck-core

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that abort a validation run before a report is produced.
///
/// Individual check failures never surface here — they become failed or
/// warning entries in the report instead.
#[derive(Error, Debug)]
pub enum ValidateError {
    /// The supplied project path does not exist.
    #[error("project path not found: {0}")]
    PathNotFound(Utf8PathBuf),
}
