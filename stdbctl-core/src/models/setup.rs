//! Install and configuration mutation types.
//!
//! - [`VersionInfo`] - Result of `spacetime version`
//! - [`InstallOutcome`] - Result of installing the CLI
//! - [`AddIdentityOutcome`] / [`AddServerOutcome`] - Mutation results

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::cli::CliResult;
use crate::error::CoreError;

// ============================================================================
// Version / Install
// ============================================================================

/// Whether the CLI is installed and which version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// True if `version` ran without error text.
    pub installed: bool,
    /// Tool version, when printed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// The shell reported the program as unknown.
    pub command_not_found: bool,
    /// The raw result.
    pub result: CliResult,
}

/// Outcome of installing the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallOutcome {
    /// True if the installer reported no error.
    pub is_installed: bool,
    /// Directory holding the installed executable, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<PathBuf>,
    /// The raw result.
    pub result: CliResult,
}

// ============================================================================
// Mutations
// ============================================================================

/// Why adding an identity or server failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddErrorKind {
    /// The nickname is already taken.
    AlreadyExists,
    /// Any other failure.
    Unclassified,
}

/// Arguments for `identity new`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddIdentityRequest {
    /// Identity nickname.
    pub nickname: String,
    /// Email to associate.
    pub email: String,
}

impl AddIdentityRequest {
    /// Creates a request.
    pub fn new(nickname: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            email: email.into(),
        }
    }

    /// Checks that nickname and email are set.
    pub fn validate(&self) -> Result<(), CoreError> {
        require("nickname", &self.nickname)?;
        require("email", &self.email)
    }
}

/// Outcome of adding an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddIdentityOutcome {
    /// Failure classification, when it failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<AddErrorKind>,
    /// The raw result.
    pub result: CliResult,
}

/// Arguments for `server add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddServerRequest {
    /// Server nickname.
    pub nickname: String,
    /// Host URL.
    pub host: String,
    /// Skip fetching the fingerprint (server need not be running).
    pub no_fingerprint: bool,
}

impl AddServerRequest {
    /// Creates a request that fetches the fingerprint.
    pub fn new(nickname: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            host: host.into(),
            no_fingerprint: false,
        }
    }

    /// Skips the fingerprint fetch.
    #[must_use]
    pub fn without_fingerprint(mut self) -> Self {
        self.no_fingerprint = true;
        self
    }

    /// Checks that nickname and host are set.
    pub fn validate(&self) -> Result<(), CoreError> {
        require("nickname", &self.nickname)?;
        require("host", &self.host)
    }
}

fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::InvalidRequest(format!("{field} is empty")));
    }
    Ok(())
}

/// Outcome of adding a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddServerOutcome {
    /// Failure classification, when it failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<AddErrorKind>,
    /// The raw result.
    pub result: CliResult,
}

impl AddIdentityOutcome {
    /// Returns true if the identity was added.
    pub fn is_success(&self) -> bool {
        self.error_kind.is_none()
    }
}

impl AddServerOutcome {
    /// Returns true if the server was added.
    pub fn is_success(&self) -> bool {
        self.error_kind.is_none()
    }
}
