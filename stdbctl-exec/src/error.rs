//! Execution error types.

use thiserror::Error;

// ============================================================================
// Exec Error
// ============================================================================

/// Error type for running CLI commands.
///
/// Cancellation is not an error: a canceled invocation returns a normal
/// result carrying the cancellation sentinel.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The host OS (or the requested operation on it) is not supported.
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// The shell process could not be started.
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        /// Command that was being started.
        command: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The invocation had no command text.
    #[error("Empty command")]
    EmptyCommand,

    /// IO error while waiting on the process.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExecError {
    /// Returns true if the error means nothing was run at all.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ExecError::UnsupportedPlatform(_))
    }
}
