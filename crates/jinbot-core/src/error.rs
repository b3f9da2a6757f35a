//! JinBot error types.

use thiserror::Error;

/// Errors shared across all JinBot crates.
#[derive(Debug, Error)]
pub enum JinbotError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, JinbotError>;
