//! Publish and code generation types.
//!
//! - [`PublishRequest`] / [`PublishOutcome`] - `spacetime publish`
//! - [`PublishErrorKind`] - Coarse classification of publish failures
//! - [`GenerateRequest`] / [`GenerateOutcome`] - `spacetime generate`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::cli::CliResult;
use crate::error::CoreError;

// ============================================================================
// Publish Request
// ============================================================================

/// Arguments for publishing a server module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRequest {
    /// Database/module name to publish as.
    pub module_name: String,
    /// Path to the server module project.
    pub project_path: PathBuf,
    /// Wipe existing data on publish.
    #[serde(default)]
    pub clear_data: bool,
    /// Build in debug mode.
    #[serde(default)]
    pub debug: bool,
}

impl PublishRequest {
    /// Creates a publish request with default options.
    pub fn new(module_name: impl Into<String>, project_path: impl Into<PathBuf>) -> Self {
        Self {
            module_name: module_name.into(),
            project_path: project_path.into(),
            clear_data: false,
            debug: false,
        }
    }

    /// Sets whether to clear existing data.
    #[must_use]
    pub fn with_clear_data(mut self, clear_data: bool) -> Self {
        self.clear_data = clear_data;
        self
    }

    /// Sets whether to build in debug mode.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Checks that the module name and project path are set.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.module_name.trim().is_empty() {
            return Err(CoreError::InvalidRequest("module name is empty".to_string()));
        }
        if self.project_path.as_os_str().is_empty() {
            return Err(CoreError::InvalidRequest("project path is empty".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Publish Error Kind
// ============================================================================

/// Coarse classification of a failed publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishErrorKind {
    /// A build runtime the module needs (e.g. .NET 8+) is missing.
    RuntimePrerequisiteMissing,
    /// The project path does not contain a buildable project.
    InvalidProjectDirectory,
    /// The database exists and the identity may not update it.
    PermissionDenied,
    /// Any other failure.
    Unclassified,
}

impl PublishErrorKind {
    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RuntimePrerequisiteMissing => "Missing build prerequisite",
            Self::InvalidProjectDirectory => "Invalid project directory",
            Self::PermissionDenied => "Permission denied",
            Self::Unclassified => "Publish failed",
        }
    }
}

impl fmt::Display for PublishErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Publish Outcome
// ============================================================================

/// Outcome of a publish.
///
/// Callers cache successful outcomes to drive code generation later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishOutcome {
    /// Whether the module was published.
    pub is_success: bool,
    /// Failure classification, when not successful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<PublishErrorKind>,
    /// Host the module was uploaded to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_host: Option<String>,
    /// Resulting database address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_address: Option<String>,
    /// When the publish finished.
    pub published_at: DateTime<Utc>,
    /// Whether the build was optimized with wasm-opt.
    pub is_optimized: bool,
    /// The request that produced this outcome.
    pub request: PublishRequest,
    /// The raw result.
    pub result: CliResult,
}

impl PublishOutcome {
    /// Returns the error text, if the publish failed.
    pub fn error_message(&self) -> Option<&str> {
        if self.is_success {
            None
        } else {
            Some(self.result.error.as_str())
        }
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Arguments for client code generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Path to the server module project.
    pub project_path: PathBuf,
    /// Directory to write generated files to.
    pub out_dir: PathBuf,
    /// Target language (e.g. `csharp`).
    pub lang: String,
    /// Delete files in `out_dir` that are no longer generated.
    pub delete_outdated: bool,
}

impl GenerateRequest {
    /// Default target language.
    pub const DEFAULT_LANG: &'static str = "csharp";

    /// Creates a generate request for the default language.
    pub fn new(project_path: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_path: project_path.into(),
            out_dir: out_dir.into(),
            lang: Self::DEFAULT_LANG.to_string(),
            delete_outdated: true,
        }
    }

    /// Sets the target language.
    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }
}

/// Outcome of client code generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOutcome {
    /// Whether generation succeeded.
    pub is_success: bool,
    /// Output directory (as requested, not parsed).
    pub out_dir: PathBuf,
    /// The raw result.
    pub result: CliResult,
}
