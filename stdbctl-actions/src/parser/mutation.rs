//! `identity new` and `server add` output.

use stdbctl_core::{AddErrorKind, AddIdentityOutcome, AddServerOutcome, CliResult};

use super::common::contains_ignore_case;

const ALREADY_EXISTS_PHRASES: &[&str] = &["already exists", "already in use"];

/// Classifies a failed add. Returns `None` when there was no error.
pub fn classify_add_error(result: &CliResult) -> Option<AddErrorKind> {
    if !result.has_error() {
        return None;
    }
    let exists = ALREADY_EXISTS_PHRASES
        .iter()
        .any(|phrase| contains_ignore_case(&result.error, phrase));
    Some(if exists {
        AddErrorKind::AlreadyExists
    } else {
        AddErrorKind::Unclassified
    })
}

/// Parses `identity new` output.
pub fn parse_add_identity(result: CliResult) -> AddIdentityOutcome {
    AddIdentityOutcome {
        error_kind: classify_add_error(&result),
        result,
    }
}

/// Parses `server add` output.
pub fn parse_add_server(result: CliResult) -> AddServerOutcome {
    AddServerOutcome {
        error_kind: classify_add_error(&result),
        result,
    }
}
