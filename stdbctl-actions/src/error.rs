//! Action error types.

use stdbctl_core::CoreError;
use stdbctl_exec::ExecError;
use thiserror::Error;

/// Error type for high-level CLI actions.
///
/// Errors reported by the CLI itself are not represented here: they stay
/// in the returned result so callers can show and classify them.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The command could not be run.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// The request was invalid.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Killing the process on the server port failed.
    #[error("Failed to stop local server on port {port}: {message}")]
    StopServerFailed {
        /// Port that was targeted.
        port: u16,
        /// CLI error text.
        message: String,
    },

    /// A setup step failed.
    #[error("Setup failed: {0}")]
    Setup(String),

    /// The CLI was installed but is not reachable from this process yet.
    #[error("The CLI was installed but is not on the search path yet; restart your shell")]
    RestartRequired,
}

impl ActionError {
    /// Returns true if a restart of the calling process would fix this.
    pub fn is_restart_required(&self) -> bool {
        matches!(self, ActionError::RestartRequired)
    }
}
