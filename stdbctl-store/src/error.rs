//! Store error types.

use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unknown settings key.
    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    /// A settings value that does not parse for its key.
    #[error("Invalid value for {key}: {value}")]
    InvalidValue {
        /// Settings key.
        key: String,
        /// Rejected value.
        value: String,
    },
}

impl StoreError {
    /// Returns true if the error came from the caller's input rather than disk.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            StoreError::UnknownKey(_) | StoreError::InvalidValue { .. }
        )
    }
}
