//! Action settings.

use std::time::Duration;

use stdbctl_exec::PollSchedule;

/// Name of the CLI program.
pub const DEFAULT_PROGRAM: &str = "spacetime";

/// Port the local server listens on.
pub const DEFAULT_PORT: u16 = 3000;

/// Nickname of the local server.
pub const LOCAL_SERVER_NAME: &str = "local";

/// URL of the local server.
pub const LOCAL_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Nickname of the hosted test network.
pub const TESTNET_SERVER_NAME: &str = "testnet";

/// URL of the hosted test network.
pub const TESTNET_SERVER_URL: &str = "https://testnet.spacetimedb.com";

/// How long to wait for a freshly started local server.
pub const DEFAULT_START_WAIT: Duration = Duration::from_secs(2);

/// A named server target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerTarget {
    /// Nickname used on the CLI.
    pub name: String,
    /// Host URL.
    pub url: String,
}

impl ServerTarget {
    /// Creates a target.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Tuning for [`crate::SpacetimeCli`].
#[derive(Debug, Clone)]
pub struct ActionSettings {
    /// CLI program name.
    pub program: String,
    /// Local server.
    pub local: ServerTarget,
    /// Hosted test network.
    pub testnet: ServerTarget,
    /// Port the local server listens on.
    pub port: u16,
    /// Ping interval and overall deadline.
    pub ping: PollSchedule,
    /// Deadline for a started local server to come online.
    pub start_wait: Duration,
}

impl Default for ActionSettings {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            local: ServerTarget::new(LOCAL_SERVER_NAME, LOCAL_SERVER_URL),
            testnet: ServerTarget::new(TESTNET_SERVER_NAME, TESTNET_SERVER_URL),
            port: DEFAULT_PORT,
            ping: PollSchedule::default(),
            start_wait: DEFAULT_START_WAIT,
        }
    }
}

impl ActionSettings {
    /// Schedule used while waiting for a started server.
    pub fn start_schedule(&self) -> PollSchedule {
        self.ping.with_deadline(self.start_wait)
    }
}
