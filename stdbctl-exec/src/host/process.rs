//! Subprocess execution for the SpacetimeDB CLI.
//!
//! Every command runs through the platform shell so that pipelines and
//! installer one-liners work unchanged. Output is read on separate tasks
//! while the runner waits for the process, a cancellation token, or a
//! deadline, whichever comes first.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use stdbctl_core::CliResult;

use crate::error::ExecError;
use crate::executor::CommandExecutor;
use crate::invocation::CliInvocation;
use crate::output::extract_error_lines;
use crate::platform::Platform;
use crate::settings::RunnerSettings;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;
#[cfg(windows)]
const DETACHED_PROCESS: u32 = 0x0000_0008;
#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

// ============================================================================
// Process Runner
// ============================================================================

/// Runs CLI command lines through the platform shell.
///
/// Clones share the installed-directory slot, so a directory recorded after
/// an install is visible to every clone.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    platform: Platform,
    settings: RunnerSettings,
    installed_dir: Arc<RwLock<Option<PathBuf>>>,
}

impl ProcessRunner {
    /// Creates a runner for the current platform.
    pub fn new() -> Result<Self, ExecError> {
        Self::with_settings(RunnerSettings::default())
    }

    /// Creates a runner for the current platform with custom settings.
    pub fn with_settings(settings: RunnerSettings) -> Result<Self, ExecError> {
        Ok(Self::for_platform(Platform::current()?, settings))
    }

    /// Creates a runner for an explicit platform.
    pub fn for_platform(platform: Platform, settings: RunnerSettings) -> Self {
        Self {
            platform,
            settings,
            installed_dir: Arc::new(RwLock::new(None)),
        }
    }

    /// Platform commands are built for.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Runner settings.
    pub fn settings(&self) -> &RunnerSettings {
        &self.settings
    }

    /// Directory recorded by the last install, if any.
    pub fn installed_dir(&self) -> Option<PathBuf> {
        self.installed_dir
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Records (or clears) the directory a fresh install put the CLI into.
    pub fn set_installed_dir(&self, dir: Option<PathBuf>) {
        debug!(dir = ?dir, "Installed directory updated");
        match self.installed_dir.write() {
            Ok(mut guard) => *guard = dir,
            Err(poisoned) => *poisoned.into_inner() = dir,
        }
    }

    /// Search path for child processes with the installed directory appended.
    ///
    /// Returns `None` when no directory is recorded or it is already present.
    pub fn child_search_path(&self) -> Option<OsString> {
        let dir = self.installed_dir()?;
        let key = self.platform.path_env_key();
        let current = std::env::var_os(key)
            .or_else(|| std::env::var_os("PATH"))
            .unwrap_or_default();

        let mut paths: Vec<PathBuf> = std::env::split_paths(&current).collect();
        if paths.contains(&dir) {
            return None;
        }
        paths.push(dir);

        match std::env::join_paths(paths) {
            Ok(joined) => Some(joined),
            Err(e) => {
                warn!(error = %e, "Installed directory cannot be added to the search path");
                None
            }
        }
    }

    /// Builds the shell command for a command line.
    fn build_command(&self, command_line: &str) -> Command {
        let mut command = Command::new(self.platform.shell());

        #[cfg(windows)]
        {
            command
                .arg(self.platform.command_flag())
                .raw_arg(format!("\"{command_line}\""));
        }
        #[cfg(not(windows))]
        {
            command.arg(self.platform.command_flag()).arg(command_line);
        }

        if let Some(path) = self.child_search_path() {
            command.env(self.platform.path_env_key(), path);
        }

        info!(
            "CLI input: {} {} {}",
            self.platform.shell(),
            self.platform.command_flag(),
            command_line
        );
        command
    }

    fn spawn(&self, mut command: Command, command_line: &str) -> Result<Child, ExecError> {
        command.spawn().map_err(|source| {
            error!(command = %command_line, error = %source, "Failed to start CLI process");
            ExecError::Spawn {
                command: command_line.to_string(),
                source,
            }
        })
    }

    /// Runs an invocation and captures its output.
    ///
    /// Timeouts and cancellation yield a result whose error is the
    /// cancellation sentinel. Background invocations return an empty
    /// result as soon as the process has started.
    #[instrument(skip(self, invocation), fields(command = %invocation.command))]
    pub async fn run(&self, invocation: &CliInvocation) -> Result<CliResult, ExecError> {
        if invocation.command.trim().is_empty() {
            return Err(ExecError::EmptyCommand);
        }
        if invocation.is_cancelled() {
            debug!("Invocation canceled before start");
            return Ok(CliResult::canceled(""));
        }

        if invocation.background {
            self.run_background(invocation)
        } else {
            self.run_foreground(invocation).await
        }
    }

    async fn run_foreground(&self, invocation: &CliInvocation) -> Result<CliResult, ExecError> {
        let start = Instant::now();
        let deadline = invocation.deadline();

        let mut command = self.build_command(&invocation.command);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);
        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        let mut child = self.spawn(command, &invocation.command)?;
        let stdout_task = tokio::spawn(read_stream(child.stdout.take()));
        let stderr_task = tokio::spawn(read_stream(child.stderr.take()));

        let status = tokio::select! {
            status = child.wait() => Some(status?),
            () = invocation.cancelled(deadline) => None,
        };

        let result = match status {
            Some(status) => {
                let output = join_stream(stdout_task).await;
                let error = join_stream(stderr_task).await;
                let errors_found = extract_error_lines(&output, &error);
                CliResult::new(output, error)
                    .with_exit_code(status.code())
                    .with_errors_found(errors_found)
            }
            None => {
                warn!("CLI invocation canceled");
                tokio::spawn(terminate(child, self.settings.cancel_grace));
                let output = drain_stream(stdout_task, self.settings.drain_timeout).await;
                stderr_task.abort();
                CliResult::canceled(output)
            }
        };

        let result = result.with_duration(start.elapsed());
        log_result(&result);
        Ok(result)
    }

    fn run_background(&self, invocation: &CliInvocation) -> Result<CliResult, ExecError> {
        let start = Instant::now();
        let deadline = invocation.deadline();

        let mut command = self.build_command(&invocation.command);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(false);
        #[cfg(unix)]
        command.process_group(0);
        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        let mut child = self.spawn(command, &invocation.command)?;
        let stdout_task = tokio::spawn(read_stream(child.stdout.take()));
        let stderr_task = tokio::spawn(read_stream(child.stderr.take()));

        let watched = invocation.clone();
        let grace = self.settings.cancel_grace;
        tokio::spawn(async move {
            tokio::select! {
                status = child.wait() => {
                    debug!(status = ?status.ok().and_then(|s| s.code()), "Background CLI process exited");
                }
                () = watched.cancelled(deadline) => {
                    warn!(command = %watched.command, "Background CLI invocation canceled");
                    terminate(child, grace).await;
                }
            }
            let output = join_stream(stdout_task).await;
            let error = join_stream(stderr_task).await;
            if !output.trim().is_empty() {
                debug!(output = %output.trim_end(), "Background CLI output");
            }
            if !error.trim().is_empty() {
                warn!(error = %error.trim_end(), "Background CLI error");
            }
        });

        Ok(CliResult::default().with_duration(start.elapsed()))
    }

    /// Starts a command that keeps running after this process exits.
    ///
    /// Used to launch the local server. Output is discarded and the child
    /// is neither awaited nor killed.
    #[instrument(skip(self))]
    pub fn run_detached(&self, command_line: &str) -> Result<(), ExecError> {
        if command_line.trim().is_empty() {
            return Err(ExecError::EmptyCommand);
        }

        let mut command = self.build_command(command_line);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false);
        #[cfg(unix)]
        command.process_group(0);
        #[cfg(windows)]
        command.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);

        let child = self.spawn(command, command_line)?;
        debug!(pid = ?child.id(), "Detached CLI process started");
        Ok(())
    }

    /// Check if a command exists on the search path.
    pub fn command_exists(&self, cmd: &str) -> bool {
        self.which(cmd).is_some()
    }

    /// Find the path to a command, including the installed directory.
    pub fn which(&self, cmd: &str) -> Option<PathBuf> {
        if let Some(path) = self.child_search_path() {
            let cwd = std::env::current_dir().ok()?;
            return which::which_in(cmd, Some(path), cwd).ok();
        }
        which::which(cmd).ok()
    }
}

#[async_trait]
impl CommandExecutor for ProcessRunner {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn run(&self, invocation: &CliInvocation) -> Result<CliResult, ExecError> {
        ProcessRunner::run(self, invocation).await
    }

    fn run_detached(&self, command: &str) -> Result<(), ExecError> {
        ProcessRunner::run_detached(self, command)
    }

    fn set_installed_dir(&self, dir: Option<PathBuf>) {
        ProcessRunner::set_installed_dir(self, dir);
    }
}

// ============================================================================
// Stream Helpers
// ============================================================================

async fn read_stream<R: AsyncRead + Unpin>(stream: Option<R>) -> String {
    let Some(mut stream) = stream else {
        return String::new();
    };
    let mut buf = Vec::new();
    if let Err(e) = stream.read_to_end(&mut buf).await {
        warn!(error = %e, "Failed to read CLI output");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

async fn join_stream(task: JoinHandle<String>) -> String {
    task.await.unwrap_or_default()
}

async fn drain_stream(task: JoinHandle<String>, timeout: Duration) -> String {
    match tokio::time::timeout(timeout, task).await {
        Ok(joined) => joined.unwrap_or_default(),
        Err(_) => String::new(),
    }
}

fn log_result(result: &CliResult) {
    if !result.output.trim().is_empty() {
        debug!(output = %result.output.trim_end(), "CLI output");
    }
    if result.is_canceled() {
        debug!("CLI result canceled");
    } else if result.has_error() {
        warn!(error = %result.error.trim_end(), "CLI error");
    }
    if result.has_errors_found() {
        warn!(count = result.errors_found.len(), errors = ?result.errors_found, "CLI errors found");
    }
}

// ============================================================================
// Termination
// ============================================================================

/// Asks the process group to exit, then kills it after `grace`.
#[cfg(unix)]
async fn terminate(mut child: Child, grace: Duration) {
    use nix::errno::Errno;
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let Some(pid) = child.id() else {
        return;
    };
    let Ok(raw) = i32::try_from(pid) else {
        warn!(pid, "Process id out of range, killing directly");
        let _ = child.kill().await;
        return;
    };
    let group = Pid::from_raw(-raw);

    match kill(group, Signal::SIGTERM) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => warn!(pid, error = %e, "Failed to send SIGTERM"),
    }

    if tokio::time::timeout(grace, child.wait()).await.is_ok() {
        debug!(pid, "CLI process exited after SIGTERM");
        return;
    }

    warn!(pid, grace = ?grace, "CLI process ignored SIGTERM, killing");
    match kill(group, Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => warn!(pid, error = %e, "Failed to send SIGKILL"),
    }
    let _ = child.kill().await;
}

/// Kills the process and waits up to `grace` for it to go away.
#[cfg(not(unix))]
async fn terminate(mut child: Child, grace: Duration) {
    if let Err(e) = child.start_kill() {
        warn!(error = %e, "Failed to kill CLI process");
        return;
    }
    if tokio::time::timeout(grace, child.wait()).await.is_err() {
        warn!(grace = ?grace, "CLI process still running after kill");
    }
}

// ============================================================================
// Tests
// ============================================================================
