//! Automatic recovery from known transient CLI failures.
//!
//! Two failures are recognized by substring in the error text. Both are
//! fixed the same way: make sure the local server runs, refresh its
//! fingerprint, then retry the original command once.
//!
//! Recovery state lives in a [`RecoveryContext`] created per top-level
//! action, so concurrent actions never share a guard.

use serde::{Deserialize, Serialize};
use std::fmt;

use stdbctl_core::CliResult;

/// Maximum automatic retries per top-level action.
pub const MAX_AUTO_RETRIES: u32 = 1;

// ============================================================================
// Recoverable Errors
// ============================================================================

/// A CLI failure that can be fixed automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoverableError {
    /// The CLI has no saved fingerprint for the local server.
    MissingLocalFingerprint,
    /// The local server refused the connection.
    LocalServerOffline,
}

impl fmt::Display for RecoverableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLocalFingerprint => write!(f, "missing local fingerprint"),
            Self::LocalServerOffline => write!(f, "local server offline"),
        }
    }
}

/// Error signatures, checked in order (case-sensitive).
pub const SIGNATURES: &[(&str, RecoverableError)] = &[
    (
        "without a saved fingerprint: local",
        RecoverableError::MissingLocalFingerprint,
    ),
    (
        "target machine actively refused",
        RecoverableError::LocalServerOffline,
    ),
];

/// Detects a recoverable failure. Canceled and successful results never match.
pub fn classify(result: &CliResult) -> Option<RecoverableError> {
    if !result.has_error() || result.is_canceled() {
        return None;
    }
    SIGNATURES
        .iter()
        .find(|(pattern, _)| result.error.contains(pattern))
        .map(|(_, kind)| *kind)
}

// ============================================================================
// Recovery Context
// ============================================================================

/// Recovery state for one top-level action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryContext {
    enabled: bool,
    retries: u32,
}

impl RecoveryContext {
    /// Creates a context that allows recovery.
    pub fn new() -> Self {
        Self {
            enabled: true,
            retries: 0,
        }
    }

    /// Creates a context that never recovers. Used for recovery's own steps.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            retries: 0,
        }
    }

    /// Whether recovery may still run.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Retries performed so far.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Returns the failure to recover from, if this result has one and the
    /// retry budget is not spent.
    pub fn recoverable(&self, result: &CliResult) -> Option<RecoverableError> {
        if !self.enabled || self.retries >= MAX_AUTO_RETRIES {
            return None;
        }
        classify(result)
    }

    /// Records a recovery attempt.
    pub fn record_attempt(&mut self) {
        self.retries += 1;
    }
}

impl Default for RecoveryContext {
    fn default() -> Self {
        Self::new()
    }
}
