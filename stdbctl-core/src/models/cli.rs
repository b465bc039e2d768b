//! Raw CLI result types.
//!
//! This module contains the untyped output of a single CLI invocation:
//! - [`CliResult`] - Captured stdout/stderr plus derived error state
//! - [`CANCELED_SENTINEL`] - Error text used for canceled invocations

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Error text stored in [`CliResult::error`] when an invocation was canceled
/// or timed out before the process exited.
pub const CANCELED_SENTINEL: &str = "Canceled";

// ============================================================================
// CLI Result
// ============================================================================

/// Captured output of one CLI invocation.
///
/// Immutable once constructed; owned by whoever issued the invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliResult {
    /// Standard output content.
    pub output: String,
    /// Standard error content, or [`CANCELED_SENTINEL`].
    pub error: String,
    /// Exit code, when the process exited on its own.
    pub exit_code: Option<i32>,
    /// Wall time spent on the invocation.
    #[serde(default)]
    pub duration: Duration,
    /// Individual error lines pulled out of the output streams.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors_found: Vec<String>,
}

impl CliResult {
    /// Creates a result from captured output and error text.
    pub fn new(output: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            error: error.into(),
            ..Self::default()
        }
    }

    /// Creates a canceled result, keeping whatever stdout was drained.
    pub fn canceled(output: impl Into<String>) -> Self {
        Self::new(output, CANCELED_SENTINEL)
    }

    /// Sets the exit code.
    #[must_use]
    pub fn with_exit_code(mut self, code: Option<i32>) -> Self {
        self.exit_code = code;
        self
    }

    /// Sets the elapsed duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the extracted error lines.
    #[must_use]
    pub fn with_errors_found(mut self, errors: Vec<String>) -> Self {
        self.errors_found = errors;
        self
    }

    /// Returns true if the CLI wrote any error text.
    pub fn has_error(&self) -> bool {
        !self.error.trim().is_empty()
    }

    /// Returns true if the invocation was canceled or timed out.
    pub fn is_canceled(&self) -> bool {
        self.error == CANCELED_SENTINEL
    }

    /// Returns true if error lines were extracted from the output.
    pub fn has_errors_found(&self) -> bool {
        !self.errors_found.is_empty()
    }

    /// Returns the error text clipped to `max_chars` characters.
    pub fn clipped_error(&self, max_chars: usize) -> String {
        clip(&self.error, max_chars)
    }
}

/// Clips a string to `max_chars` characters, appending an ellipsis when cut.
pub fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max_chars).collect();
    clipped.push('…');
    clipped
}

// ============================================================================
// Tests
// ============================================================================
