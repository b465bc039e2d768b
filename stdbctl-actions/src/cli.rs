//! High-level SpacetimeDB CLI actions.
//!
//! [`SpacetimeCli`] builds one command per action, runs it through the
//! recovery loop, and parses the output into a typed outcome. CLI-reported
//! failures come back inside the outcome; `Err` means nothing could run.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use stdbctl_core::{
    AddIdentityOutcome, AddIdentityRequest, AddServerOutcome, AddServerRequest, CliResult,
    DatabaseAddresses, GenerateOutcome, GenerateRequest, IdentityListing, InstallOutcome,
    ModuleDescription, ModuleLogs, PingOutcome, PublishOutcome, PublishRequest, ServerListing,
    VersionInfo,
};
use stdbctl_exec::{CliInvocation, CommandExecutor, Platform, PollSchedule};

use crate::commands::CliCommands;
use crate::error::ActionError;
use crate::parser;
use crate::recovery::{RecoverableError, RecoveryContext};
use crate::settings::ActionSettings;

// ============================================================================
// Spacetime CLI
// ============================================================================

/// Façade over the SpacetimeDB CLI.
///
/// A token attached with [`SpacetimeCli::with_cancel`] aborts every
/// invocation the façade starts, retries and recovery steps included.
#[derive(Clone)]
pub struct SpacetimeCli {
    executor: Arc<dyn CommandExecutor>,
    commands: CliCommands,
    settings: ActionSettings,
    cancel: Option<CancellationToken>,
}

impl std::fmt::Debug for SpacetimeCli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpacetimeCli")
            .field("platform", &self.executor.platform())
            .field("commands", &self.commands)
            .field("settings", &self.settings)
            .field("cancelable", &self.cancel.is_some())
            .finish_non_exhaustive()
    }
}

impl SpacetimeCli {
    /// Creates a façade with default settings.
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self::with_settings(executor, ActionSettings::default())
    }

    /// Creates a façade with custom settings.
    pub fn with_settings(executor: Arc<dyn CommandExecutor>, settings: ActionSettings) -> Self {
        let commands = CliCommands::new(settings.program.clone(), executor.platform());
        Self {
            executor,
            commands,
            settings,
            cancel: None,
        }
    }

    /// Aborts every invocation when `token` is cancelled.
    #[must_use]
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The token attached with [`SpacetimeCli::with_cancel`].
    pub fn cancel_token(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }

    /// Settings in use.
    pub fn settings(&self) -> &ActionSettings {
        &self.settings
    }

    /// Command templates in use.
    pub fn commands(&self) -> &CliCommands {
        &self.commands
    }

    /// Platform commands are built for.
    pub fn platform(&self) -> Platform {
        self.executor.platform()
    }

    // ------------------------------------------------------------------------
    // Running
    // ------------------------------------------------------------------------

    fn invocation(&self, command: impl Into<String>) -> CliInvocation {
        CliInvocation::new(command).with_cancel_opt(self.cancel.clone())
    }

    async fn run_command(&self, command: String) -> Result<CliResult, ActionError> {
        let mut ctx = RecoveryContext::new();
        self.run_recovering(&self.invocation(command), &mut ctx)
            .await
    }

    /// Runs an invocation, recovering from known transient failures.
    ///
    /// At most [`crate::recovery::MAX_AUTO_RETRIES`] retries happen per
    /// context. When recovery does not succeed the original result is
    /// returned unchanged.
    pub async fn run_recovering(
        &self,
        invocation: &CliInvocation,
        ctx: &mut RecoveryContext,
    ) -> Result<CliResult, ActionError> {
        loop {
            let result = self.executor.run(invocation).await?;
            if invocation.is_cancelled() {
                return Ok(result);
            }
            let Some(kind) = ctx.recoverable(&result) else {
                return Ok(result);
            };
            ctx.record_attempt();

            warn!(%kind, command = %invocation.command, "Recoverable CLI error, attempting recovery");
            if !self.recover(kind).await {
                warn!(%kind, "Recovery did not succeed");
                return Ok(result);
            }
            info!(%kind, "Recovered, retrying command");
        }
    }

    /// Ensures the local server runs and refreshes its fingerprint.
    ///
    /// Every step runs with recovery disabled.
    async fn recover(&self, kind: RecoverableError) -> bool {
        let local = self.settings.local.name.clone();

        match self.ping(Some(&local), None).await {
            Ok(ping) if ping.is_online => debug!("Local server already online"),
            Ok(_) => match self.start_local_server_and_wait().await {
                Ok(started) if started.is_online => info!("Local server started"),
                Ok(started) => warn!(%started, "Local server did not come online"),
                Err(e) => warn!(error = %e, "Failed to start local server"),
            },
            Err(e) => warn!(error = %e, "Failed to ping local server"),
        }

        match self.create_fingerprint(&local).await {
            Ok(result) if !result.has_error() => true,
            Ok(result) => {
                warn!(%kind, error = %result.clipped_error(200), "Fingerprint refresh failed");
                false
            }
            Err(e) => {
                warn!(%kind, error = %e, "Fingerprint refresh failed");
                false
            }
        }
    }

    // ------------------------------------------------------------------------
    // Install
    // ------------------------------------------------------------------------

    /// Checks whether the CLI is installed (`version`).
    #[instrument(skip(self))]
    pub async fn check_installed(&self) -> Result<VersionInfo, ActionError> {
        let result = self.run_command(self.commands.version()).await?;
        Ok(parser::parse_version(result))
    }

    /// Installs the CLI with the platform installer.
    ///
    /// A reported install directory is added to the search path of every
    /// later invocation.
    #[instrument(skip(self))]
    pub async fn install(&self) -> Result<InstallOutcome, ActionError> {
        let command = self.platform().install_command()?;
        let result = self.run_command(command.to_string()).await?;
        let outcome = parser::parse_install(result);

        if let Some(dir) = &outcome.install_dir {
            info!(dir = %dir.display(), "CLI installed");
            self.executor.set_installed_dir(Some(dir.clone()));
        }
        Ok(outcome)
    }

    /// Records an install directory found some other way.
    pub fn set_installed_dir(&self, dir: Option<PathBuf>) {
        self.executor.set_installed_dir(dir);
    }

    // ------------------------------------------------------------------------
    // Listings
    // ------------------------------------------------------------------------

    /// Lists configured servers.
    #[instrument(skip(self))]
    pub async fn list_servers(&self) -> Result<ServerListing, ActionError> {
        let result = self.run_command(self.commands.server_list()).await?;
        Ok(parser::parse_server_listing(result))
    }

    /// Lists identities for the default server.
    #[instrument(skip(self))]
    pub async fn list_identities(&self) -> Result<IdentityListing, ActionError> {
        let result = self.run_command(self.commands.identity_list()).await?;
        Ok(parser::parse_identity_listing(result))
    }

    /// Lists database addresses owned by an identity.
    #[instrument(skip(self))]
    pub async fn list_database_addresses(
        &self,
        identity: &str,
    ) -> Result<DatabaseAddresses, ActionError> {
        let result = self
            .run_command(self.commands.list_databases(identity))
            .await?;
        Ok(parser::parse_database_addresses(identity, result))
    }

    /// Describes a published module's reducers.
    #[instrument(skip(self))]
    pub async fn describe_module(
        &self,
        module_name: &str,
        as_identity: Option<&str>,
    ) -> Result<ModuleDescription, ActionError> {
        let result = self
            .run_command(self.commands.describe(module_name, as_identity))
            .await?;
        Ok(parser::parse_describe(module_name, result))
    }

    /// Fetches a module's logs.
    #[instrument(skip(self))]
    pub async fn get_logs(&self, module_name: &str) -> Result<ModuleLogs, ActionError> {
        let result = self.run_command(self.commands.logs(module_name)).await?;
        Ok(parser::parse_logs(module_name, result))
    }

    // ------------------------------------------------------------------------
    // Reachability
    // ------------------------------------------------------------------------

    /// Pings a server once.
    ///
    /// Without a token the ping is bounded by the configured deadline
    /// (200 ms by default). The façade token still applies.
    #[instrument(skip(self, cancel))]
    pub async fn ping(
        &self,
        server: Option<&str>,
        cancel: Option<CancellationToken>,
    ) -> Result<PingOutcome, ActionError> {
        let invocation = match cancel {
            Some(token) => CliInvocation::new(self.commands.server_ping(server)).with_cancel(token),
            None => self
                .invocation(self.commands.server_ping(server))
                .with_timeout(self.settings.ping.deadline),
        };
        let result = self.executor.run(&invocation).await?;
        Ok(parser::parse_ping(result, server))
    }

    /// Pings a server once, bounded by `timeout` and the optional token.
    #[instrument(skip(self, cancel))]
    pub async fn ping_within(
        &self,
        server: Option<&str>,
        timeout: Duration,
        cancel: Option<CancellationToken>,
    ) -> Result<PingOutcome, ActionError> {
        let invocation = CliInvocation::new(self.commands.server_ping(server))
            .with_timeout(timeout)
            .with_cancel_opt(cancel.or_else(|| self.cancel.clone()));
        let result = self.executor.run(&invocation).await?;
        Ok(parser::parse_ping(result, server))
    }

    /// Pings repeatedly until the server answers or the configured deadline
    /// passes.
    pub async fn ping_until_online(
        &self,
        server: Option<&str>,
        cancel: Option<CancellationToken>,
    ) -> Result<PingOutcome, ActionError> {
        self.poll_until_online(server, self.settings.ping, cancel)
            .await
    }

    /// Pings on `schedule` until the server answers.
    ///
    /// Each attempt gets its own timeout. Running out of time or being
    /// canceled yields an offline outcome with reason `Canceled`.
    #[instrument(skip(self, cancel))]
    pub async fn poll_until_online(
        &self,
        server: Option<&str>,
        schedule: PollSchedule,
        cancel: Option<CancellationToken>,
    ) -> Result<PingOutcome, ActionError> {
        let cancel = cancel.or_else(|| self.cancel.clone());
        let start = Instant::now();
        let mut attempts = 0u32;

        while let Some(timeout) = schedule.attempt_timeout(start.elapsed()) {
            if cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
                break;
            }
            attempts += 1;
            let attempt_start = Instant::now();

            let invocation = CliInvocation::new(self.commands.server_ping(server))
                .with_timeout(timeout)
                .with_cancel_opt(cancel.clone());
            let mut outcome = parser::parse_ping(self.executor.run(&invocation).await?, server);
            if outcome.is_online {
                outcome.elapsed = start.elapsed();
                debug!(attempts, elapsed = ?outcome.elapsed, "Server online");
                return Ok(outcome);
            }

            let delay = schedule.delay_after(start.elapsed(), attempt_start.elapsed());
            if !sleep_unless_cancelled(delay, cancel.as_ref()).await {
                break;
            }
        }

        debug!(attempts, "Server did not come online in time");
        let mut outcome = PingOutcome::timed_out();
        outcome.host_url = server.map(str::to_string);
        outcome.elapsed = start.elapsed();
        Ok(outcome)
    }

    /// Starts the local server as a detached process and waits for it.
    #[instrument(skip(self))]
    pub async fn start_local_server_and_wait(&self) -> Result<PingOutcome, ActionError> {
        if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Ok(PingOutcome::timed_out());
        }
        self.executor.run_detached(&self.commands.start())?;
        let local = self.settings.local.name.clone();
        self.poll_until_online(Some(&local), self.settings.start_schedule(), None)
            .await
    }

    /// Kills whatever listens on `port` (default: the local server port).
    ///
    /// Any error text from the kill command is an error.
    #[instrument(skip(self))]
    pub async fn force_stop_local_server(&self, port: Option<u16>) -> Result<CliResult, ActionError> {
        let port = port.unwrap_or(self.settings.port);
        let command = self.platform().kill_by_port_command(port);
        let result = self.executor.run(&self.invocation(command)).await?;
        if result.has_error() {
            return Err(ActionError::StopServerFailed {
                port,
                message: result.error.trim().to_string(),
            });
        }
        info!(port, "Local server stopped");
        Ok(result)
    }

    /// Fetches and saves a server's fingerprint.
    #[instrument(skip(self))]
    pub async fn create_fingerprint(&self, server: &str) -> Result<CliResult, ActionError> {
        let invocation = self.invocation(self.commands.server_fingerprint(server));
        Ok(self.executor.run(&invocation).await?)
    }

    // ------------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------------

    /// Creates a new default identity.
    #[instrument(skip(self))]
    pub async fn add_identity(
        &self,
        request: &AddIdentityRequest,
    ) -> Result<AddIdentityOutcome, ActionError> {
        request.validate()?;
        let result = self.run_command(self.commands.identity_new(request)).await?;
        Ok(parser::parse_add_identity(result))
    }

    /// Adds a server and makes it the default.
    #[instrument(skip(self))]
    pub async fn add_server(&self, request: &AddServerRequest) -> Result<AddServerOutcome, ActionError> {
        request.validate()?;
        let result = self.run_command(self.commands.server_add(request)).await?;
        Ok(parser::parse_add_server(result))
    }

    /// Sets the default identity by nickname or hash.
    #[instrument(skip(self))]
    pub async fn set_default_identity(&self, identity: &str) -> Result<CliResult, ActionError> {
        self.run_command(self.commands.identity_set_default(identity))
            .await
    }

    /// Sets the default server by nickname or host.
    #[instrument(skip(self))]
    pub async fn set_default_server(&self, server: &str) -> Result<CliResult, ActionError> {
        self.run_command(self.commands.server_set_default(server))
            .await
    }

    // ------------------------------------------------------------------------
    // Modules
    // ------------------------------------------------------------------------

    /// Builds and publishes a server module.
    #[instrument(skip(self), fields(module = %request.module_name))]
    pub async fn publish(&self, request: &PublishRequest) -> Result<PublishOutcome, ActionError> {
        request.validate()?;
        let result = self.run_command(self.commands.publish(request)).await?;
        let outcome = parser::parse_publish(request.clone(), result, Utc::now());

        if outcome.is_success {
            info!(
                address = outcome.database_address.as_deref().unwrap_or_default(),
                optimized = outcome.is_optimized,
                "Module published"
            );
        } else {
            warn!(kind = ?outcome.error_kind, "Publish failed");
        }
        Ok(outcome)
    }

    /// Generates client bindings for a module.
    #[instrument(skip(self))]
    pub async fn generate_client_files(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateOutcome, ActionError> {
        let result = self.run_command(self.commands.generate(request)).await?;
        Ok(parser::parse_generate(request, result))
    }

    /// Calls a reducer.
    #[instrument(skip(self))]
    pub async fn call_reducer(
        &self,
        module_name: &str,
        reducer: &str,
        args: &[String],
    ) -> Result<CliResult, ActionError> {
        self.run_command(self.commands.call(module_name, reducer, args))
            .await
    }
}

/// Sleeps for `delay`. Returns false if the token fired first.
async fn sleep_unless_cancelled(delay: Duration, cancel: Option<&CancellationToken>) -> bool {
    if delay.is_zero() {
        return true;
    }
    match cancel {
        Some(token) => {
            tokio::select! {
                () = token.cancelled() => false,
                () = tokio::time::sleep(delay) => true,
            }
        }
        None => {
            tokio::time::sleep(delay).await;
            true
        }
    }
}
