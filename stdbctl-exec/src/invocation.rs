//! A single CLI invocation request.

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// What to run and how to stop it.
///
/// A timeout behaves exactly like cancellation: the process is terminated
/// and the result carries the cancellation sentinel.
#[derive(Debug, Clone, Default)]
pub struct CliInvocation {
    /// Full command line passed to the shell (e.g. `spacetime server list`).
    pub command: String,
    /// Token that aborts the invocation when cancelled.
    pub cancel: Option<CancellationToken>,
    /// Deadline measured from when the invocation starts.
    pub timeout: Option<Duration>,
    /// Return immediately and keep reading output in the background.
    pub background: bool,
}

impl CliInvocation {
    /// Creates a foreground invocation with no deadline.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    /// Attaches a cancellation token.
    #[must_use]
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Attaches an optional cancellation token.
    #[must_use]
    pub fn with_cancel_opt(mut self, token: Option<CancellationToken>) -> Self {
        self.cancel = token;
        self
    }

    /// Sets a deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Runs without waiting for the process to exit.
    #[must_use]
    pub fn in_background(mut self) -> Self {
        self.background = true;
        self
    }

    /// Returns true if the token was cancelled before anything ran.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Computes the absolute deadline for an invocation starting now.
    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.timeout.map(|t| Instant::now() + t)
    }

    /// Resolves once the token is cancelled or `deadline` passes.
    ///
    /// Never resolves when neither is set.
    pub(crate) async fn cancelled(&self, deadline: Option<Instant>) {
        match (&self.cancel, deadline) {
            (Some(token), Some(deadline)) => {
                tokio::select! {
                    () = token.cancelled() => {}
                    () = tokio::time::sleep_until(deadline) => {}
                }
            }
            (Some(token), None) => token.cancelled().await,
            (None, Some(deadline)) => tokio::time::sleep_until(deadline).await,
            (None, None) => std::future::pending::<()>().await,
        }
    }
}
