//! Fixed-interval polling schedules.
//!
//! Used to ping a server repeatedly until it answers or a deadline passes.

use std::time::Duration;

/// Default time between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default overall deadline.
pub const DEFAULT_POLL_DEADLINE: Duration = Duration::from_millis(200);

/// Schedule for repeating an attempt until a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    /// Delay between attempts, also used as the per-attempt timeout.
    pub interval: Duration,
    /// Total time budget.
    pub deadline: Duration,
}

impl PollSchedule {
    /// Creates a schedule.
    pub fn new(interval: Duration, deadline: Duration) -> Self {
        Self { interval, deadline }
    }

    /// Sets the overall deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Timeout for one attempt given the remaining budget.
    ///
    /// Returns `None` once the budget is spent.
    pub fn attempt_timeout(&self, elapsed: Duration) -> Option<Duration> {
        let remaining = self.deadline.checked_sub(elapsed)?;
        if remaining.is_zero() {
            return None;
        }
        Some(self.interval.min(remaining))
    }

    /// Delay before the next attempt.
    ///
    /// Attempts start one interval apart, so time spent in the attempt is
    /// subtracted. Capped by the remaining budget.
    pub fn delay_after(&self, elapsed: Duration, attempt: Duration) -> Duration {
        self.interval
            .saturating_sub(attempt)
            .min(self.deadline.saturating_sub(elapsed))
    }
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_POLL_DEADLINE)
    }
}
