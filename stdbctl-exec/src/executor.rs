//! The seam between CLI actions and real processes.

use async_trait::async_trait;
use std::path::PathBuf;

use stdbctl_core::CliResult;

use crate::error::ExecError;
use crate::invocation::CliInvocation;
use crate::platform::Platform;

/// Runs CLI command lines.
///
/// [`crate::ProcessRunner`] is the real implementation. Tests substitute a
/// scripted executor that replays canned results.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Platform commands are built for.
    fn platform(&self) -> Platform;

    /// Runs an invocation and captures its output.
    ///
    /// Cancellation and timeouts produce `Ok` with the cancellation
    /// sentinel. `Err` means the process could not be run at all.
    async fn run(&self, invocation: &CliInvocation) -> Result<CliResult, ExecError>;

    /// Starts a command that outlives this process. Output is discarded.
    fn run_detached(&self, command: &str) -> Result<(), ExecError>;

    /// Records the directory a fresh install put the CLI into.
    ///
    /// Later invocations see it appended to the search path.
    fn set_installed_dir(&self, dir: Option<PathBuf>);
}
