//! `server ping` output.

use regex::Regex;
use std::sync::LazyLock;

use stdbctl_core::{CliResult, OfflineReason, PingOutcome};

use super::common::{clean, contains_ignore_case};

/// URL on the `Server is online: <url>` line.
static ONLINE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)online:?\s*((?:https?://)?[A-Za-z0-9.\-\[\]:]+(?::\d+)?[^\s]*)")
        .expect("Invalid regex")
});

/// Explicit port in a URL or `host:port`.
static PORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(\d{1,5})(?:/|$)").expect("Invalid regex"));

/// Messages meaning nothing listens on the target port.
const REFUSED_PHRASES: &[&str] = &["actively refused", "connection refused"];

/// Returns true if the error says the connection was refused.
pub fn is_connection_refused(error: &str) -> bool {
    REFUSED_PHRASES
        .iter()
        .any(|phrase| contains_ignore_case(error, phrase))
}

/// Extracts an explicit port from a URL.
pub fn port_from_url(url: &str) -> Option<u16> {
    PORT_RE
        .captures(url.trim_end_matches('/'))
        .and_then(|caps| caps[1].parse().ok())
}

/// Parses `server ping` output.
///
/// `server` is the nickname or URL that was pinged, used as the host
/// when the output does not print one.
pub fn parse_ping(result: CliResult, server: Option<&str>) -> PingOutcome {
    if result.is_canceled() {
        return PingOutcome::offline(OfflineReason::Canceled, result);
    }
    if result.has_error() {
        let reason = if is_connection_refused(&result.error) {
            OfflineReason::ConnectionRefused
        } else {
            OfflineReason::Other
        };
        let mut outcome = PingOutcome::offline(reason, result);
        outcome.host_url = server.map(str::to_string);
        return outcome;
    }

    let host_url = ONLINE_URL_RE
        .captures(&clean(&result.output))
        .map(|caps| caps[1].trim_end_matches(['.', ',']).to_string())
        .or_else(|| server.map(str::to_string));
    let port = host_url.as_deref().and_then(port_from_url);

    PingOutcome {
        is_online: true,
        host_url,
        port,
        offline_reason: None,
        elapsed: result.duration,
        result,
    }
}
