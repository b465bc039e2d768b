//! `publish` output.
//!
//! A publish succeeds when the CLI prints the resulting database address
//! and no known failure signature appears. Build warnings on stderr (such
//! as a missing wasm-opt) do not make a publish fail.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

use stdbctl_core::{CliResult, PublishErrorKind, PublishOutcome, PublishRequest};

use super::common::clean;

/// Known publish failures, checked in order against the error text.
const PUBLISH_FAILURES: &[(&str, PublishErrorKind)] = &[
    (
        "You must install or update .NET",
        PublishErrorKind::RuntimePrerequisiteMissing,
    ),
    (
        "'dotnet' is not recognized",
        PublishErrorKind::RuntimePrerequisiteMissing,
    ),
    (
        "dotnet: command not found",
        PublishErrorKind::RuntimePrerequisiteMissing,
    ),
    ("MSB1003", PublishErrorKind::InvalidProjectDirectory),
    ("DBUpdateRejected", PublishErrorKind::PermissionDenied),
    ("Permission denied", PublishErrorKind::PermissionDenied),
];

/// `Created new database with address: <addr>` / `Updated database with ...`.
static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)(?:created new database|updated database) with (?:address|name|domain|identity):?\s*(\S+)",
    )
    .expect("Invalid regex")
});

/// `Uploading to <server> => <url>`.
static UPLOADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)uploading to\s+(\S+)(?:\s*=>\s*(\S+))?").expect("Invalid regex")
});

/// Build output saying wasm-opt is unavailable.
static WASM_OPT_MISSING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)(?:could not find|couldn't find|not found|missing)[^\n]*wasm-opt|wasm-opt[^\n]*(?:not found|missing|not installed)",
    )
    .expect("Invalid regex")
});

/// Classifies a failed publish from its error text.
///
/// Returns `None` when no known signature matches.
pub fn classify_publish_error(error: &str) -> Option<PublishErrorKind> {
    PUBLISH_FAILURES
        .iter()
        .find(|(pattern, _)| error.contains(pattern))
        .map(|(_, kind)| *kind)
}

/// Parses `publish` output.
///
/// Depends only on its inputs; `now` becomes the publish timestamp.
pub fn parse_publish(
    request: PublishRequest,
    result: CliResult,
    now: DateTime<Utc>,
) -> PublishOutcome {
    let output = clean(&result.output);
    let error = clean(&result.error);

    let database_address = ADDRESS_RE
        .captures(&output)
        .map(|caps| caps[1].trim_end_matches(['.', ',']).to_string());
    let uploaded_host = UPLOADING_RE.captures(&output).and_then(|caps| {
        caps.get(2)
            .or_else(|| caps.get(1))
            .map(|m| m.as_str().to_string())
    });
    let is_optimized =
        !(WASM_OPT_MISSING_RE.is_match(&output) || WASM_OPT_MISSING_RE.is_match(&error));

    let classified = if result.is_canceled() {
        None
    } else {
        classify_publish_error(&error).or_else(|| classify_publish_error(&output))
    };
    let is_success = database_address.is_some() && classified.is_none() && !result.is_canceled();
    let error_kind = if is_success {
        None
    } else {
        Some(classified.unwrap_or(PublishErrorKind::Unclassified))
    };

    PublishOutcome {
        is_success,
        error_kind,
        uploaded_host,
        database_address,
        published_at: now,
        is_optimized,
        request,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PublishRequest {
        PublishRequest::new("chat", "/work/server")
    }

    const SUCCESS: &str = "Build finished successfully.\n\
                           Uploading to local => http://127.0.0.1:3000\n\
                           Publishing module...\n\
                           Created new database with address: c2006f0b3c8e3a9d4c1f5d4b8f0c2f51\n";

    #[test]
    fn test_success() {
        let now = Utc::now();
        let outcome = parse_publish(request(), CliResult::new(SUCCESS, ""), now);
        assert!(outcome.is_success);
        assert!(outcome.error_kind.is_none());
        assert_eq!(
            outcome.database_address.as_deref(),
            Some("c2006f0b3c8e3a9d4c1f5d4b8f0c2f51")
        );
        assert_eq!(outcome.uploaded_host.as_deref(), Some("http://127.0.0.1:3000"));
        assert!(outcome.is_optimized);
        assert_eq!(outcome.published_at, now);
    }

    #[test]
    fn test_success_with_wasm_opt_warning() {
        let error = "Warning: Could not find wasm-opt to optimise the module.\n";
        let outcome = parse_publish(request(), CliResult::new(SUCCESS, error), Utc::now());
        assert!(outcome.is_success);
        assert!(!outcome.is_optimized);
    }

    #[test]
    fn test_updated_database() {
        let output = "Uploading to testnet => https://testnet.spacetimedb.com\n\
                      Updated database with address: 93dda09db9a56d8fa6c024d843e805d8\n";
        let outcome = parse_publish(request(), CliResult::new(output, ""), Utc::now());
        assert!(outcome.is_success);
        assert_eq!(
            outcome.uploaded_host.as_deref(),
            Some("https://testnet.spacetimedb.com")
        );
    }

    #[test]
    fn test_classification_table() {
        let cases = [
            (
                "You must install or update .NET to run this application.",
                PublishErrorKind::RuntimePrerequisiteMissing,
            ),
            (
                "MSBUILD : error MSB1003: Specify a project or solution file.",
                PublishErrorKind::InvalidProjectDirectory,
            ),
            (
                "Error: DBUpdateRejected: identity does not own the database",
                PublishErrorKind::PermissionDenied,
            ),
            ("Error: something unexpected", PublishErrorKind::Unclassified),
        ];
        for (error, expected) in cases {
            let outcome = parse_publish(request(), CliResult::new("", error), Utc::now());
            assert!(!outcome.is_success, "{error}");
            assert_eq!(outcome.error_kind, Some(expected), "{error}");
        }
    }

    #[test]
    fn test_classified_failure_wins_over_address() {
        let error = "Permission denied (os error 13)";
        let outcome = parse_publish(request(), CliResult::new(SUCCESS, error), Utc::now());
        assert!(!outcome.is_success);
        assert_eq!(outcome.error_kind, Some(PublishErrorKind::PermissionDenied));
    }

    #[test]
    fn test_canceled_is_unclassified() {
        let outcome = parse_publish(request(), CliResult::canceled(""), Utc::now());
        assert!(!outcome.is_success);
        assert_eq!(outcome.error_kind, Some(PublishErrorKind::Unclassified));
    }

    #[test]
    fn test_same_input_same_outcome() {
        let now = Utc::now();
        let a = parse_publish(request(), CliResult::new("", "MSB1003"), now);
        let b = parse_publish(request(), CliResult::new("", "MSB1003"), now);
        assert_eq!(a, b);
    }
}
