//! Runner settings.

use std::time::Duration;

/// Default time a canceled process gets to exit before it is killed.
pub const DEFAULT_CANCEL_GRACE: Duration = Duration::from_secs(5);

/// Default time spent collecting stdout after a cancel.
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_millis(100);

/// Tuning for [`crate::ProcessRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerSettings {
    /// Time between the polite termination signal and the forced kill.
    pub cancel_grace: Duration,
    /// How long to wait for output readers after a cancel.
    pub drain_timeout: Duration,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            cancel_grace: DEFAULT_CANCEL_GRACE,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        }
    }
}

impl RunnerSettings {
    /// Sets the cancel grace period.
    #[must_use]
    pub fn with_cancel_grace(mut self, grace: Duration) -> Self {
        self.cancel_grace = grace;
        self
    }

    /// Sets the drain timeout.
    #[must_use]
    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }
}
