//! CLI error type.

use thiserror::Error;

/// Errors surfaced to the command line.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Settings(#[from] raceosd::config::SettingsFileError),

    #[error("{0}")]
    Usage(String),
}
