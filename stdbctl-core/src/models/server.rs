//! Server reachability and database types.
//!
//! - [`PingOutcome`] - Result of `server ping`
//! - [`OfflineReason`] - Why a ping did not succeed
//! - [`DatabaseAddresses`] - Result of `list <identity>`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::cli::CliResult;

// ============================================================================
// Ping Outcome
// ============================================================================

/// Why a server was reported offline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfflineReason {
    /// The host refused the connection (server process not running).
    ConnectionRefused,
    /// The ping was canceled or timed out.
    Canceled,
    /// Any other CLI error.
    Other,
}

impl OfflineReason {
    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ConnectionRefused => "connection refused",
            Self::Canceled => "timed out",
            Self::Other => "error",
        }
    }
}

/// Outcome of pinging a server.
///
/// Gates operations that need a reachable server (identity listing, publish).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingOutcome {
    /// Whether the server responded.
    pub is_online: bool,
    /// Host URL that was pinged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_url: Option<String>,
    /// Port parsed from the host URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Why the server is offline, when it is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offline_reason: Option<OfflineReason>,
    /// How long the ping took.
    #[serde(default)]
    pub elapsed: Duration,
    /// The raw result.
    pub result: CliResult,
}

impl PingOutcome {
    /// Creates an offline outcome.
    pub fn offline(reason: OfflineReason, result: CliResult) -> Self {
        Self {
            is_online: false,
            host_url: None,
            port: None,
            offline_reason: Some(reason),
            elapsed: result.duration,
            result,
        }
    }

    /// Creates an outcome for a deadline that ran out before any ping succeeded.
    pub fn timed_out() -> Self {
        Self::offline(OfflineReason::Canceled, CliResult::canceled(""))
    }

    /// Returns the host with `127.0.0.1` shown as `localhost`.
    pub fn display_host(&self) -> Option<String> {
        self.host_url
            .as_ref()
            .map(|h| h.replace("127.0.0.1", "localhost"))
    }
}

impl fmt::Display for PingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let host = self.host_url.as_deref().unwrap_or("server");
        if self.is_online {
            write!(f, "{host} is online")
        } else {
            let reason = self.offline_reason.map_or("offline", |r| r.label());
            write!(f, "{host} is offline ({reason})")
        }
    }
}

// ============================================================================
// Database Addresses
// ============================================================================

/// Databases owned by an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseAddresses {
    /// Identity the databases were listed for.
    pub identity: String,
    /// Database addresses, in source order.
    pub addresses: Vec<String>,
    /// The raw result.
    pub result: CliResult,
}

impl DatabaseAddresses {
    /// Returns true if any address was found.
    pub fn has_addresses(&self) -> bool {
        !self.addresses.is_empty()
    }
}
