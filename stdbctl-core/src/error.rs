//! Core error types for stdbctl.

use thiserror::Error;

/// Core error type for stdbctl operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A request is missing a required value.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unexpected data in CLI output.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
