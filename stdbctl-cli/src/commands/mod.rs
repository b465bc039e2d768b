//! CLI command implementations.

pub mod call;
pub mod check;
pub mod config;
pub mod dbs;
pub mod describe;
pub mod generate;
pub mod identity;
pub mod install;
pub mod logs;
pub mod publish;
pub mod server;

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use stdbctl_actions::SpacetimeCli;
use stdbctl_core::CliResult;
use stdbctl_exec::{CancellationToken, ProcessRunner};
use stdbctl_store::{PublishCache, SettingsStore};
use tracing::{debug, info};

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Everything a command needs: the façade, persisted state and output options.
pub struct AppContext {
    /// Action façade.
    pub cli: SpacetimeCli,
    /// The runner behind the façade.
    pub runner: Arc<ProcessRunner>,
    /// Settings store.
    pub store: SettingsStore,
    /// Last successful publish.
    pub publish_cache: PublishCache,
    /// Fires on Ctrl-C.
    pub cancel: CancellationToken,
    format: OutputFormat,
    pretty: bool,
    use_colors: bool,
    quiet: bool,
}

impl AppContext {
    /// Builds the runner and façade from the stored settings.
    pub async fn new(cli: &Cli, store: SettingsStore) -> Result<Self> {
        let mut settings = store.get().await;
        if let Some(program) = &cli.program {
            settings.program.clone_from(program);
        }

        let runner = Arc::new(ProcessRunner::with_settings(settings.runner_settings())?);
        if let Some(dir) = &settings.installed_dir {
            debug!(dir = %dir.display(), "Using recorded install directory");
            runner.set_installed_dir(Some(dir.clone()));
        }
        let cancel = CancellationToken::new();
        spawn_interrupt_handler(cancel.clone());
        let facade = SpacetimeCli::with_settings(runner.clone(), settings.action_settings())
            .with_cancel(cancel.clone());

        Ok(Self {
            cli: facade,
            runner,
            store,
            publish_cache: PublishCache::at_default_path(),
            cancel,
            format: cli.format,
            pretty: cli.pretty,
            use_colors: !cli.no_color,
            quiet: cli.quiet,
        })
    }

    /// Text formatter honoring `--no-color`.
    pub fn text(&self) -> TextFormatter {
        TextFormatter::new(self.use_colors)
    }

    /// Prints `value` as JSON, or the text rendering otherwise.
    pub fn emit<T, F>(&self, value: &T, render: F) -> Result<()>
    where
        T: Serialize,
        F: FnOnce(&TextFormatter) -> String,
    {
        match self.format {
            OutputFormat::Json => {
                println!("{}", JsonFormatter::new(self.pretty).format(value)?);
            }
            OutputFormat::Text => {
                if !self.quiet {
                    let text = render(&self.text());
                    if !text.is_empty() {
                        println!("{text}");
                    }
                }
            }
        }
        Ok(())
    }
}

/// Cancels `token` on the first Ctrl-C and exits on the second.
///
/// Children run in their own process groups and never see the terminal's
/// SIGINT, so the token is what stops them.
fn spawn_interrupt_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        info!("Interrupted, canceling running command");
        token.cancel();
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
}

/// The given module name, or the one last published.
pub async fn resolve_module(arg: Option<&str>, ctx: &AppContext) -> Result<String> {
    if let Some(name) = arg.filter(|n| !n.trim().is_empty()) {
        return Ok(name.to_string());
    }
    ctx.store
        .last_module_name()
        .await
        .ok_or_else(|| anyhow::anyhow!("No module given and nothing published yet"))
}

/// Exit code for a raw CLI result.
pub fn exit_code_for(result: &CliResult) -> ExitCode {
    if result.is_canceled() {
        ExitCode::Canceled
    } else if result.has_error() {
        ExitCode::CliFailed
    } else {
        ExitCode::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_for() {
        assert_eq!(exit_code_for(&CliResult::new("ok", "")), ExitCode::Success);
        assert_eq!(
            exit_code_for(&CliResult::new("", "Error: boom")),
            ExitCode::CliFailed
        );
        assert_eq!(exit_code_for(&CliResult::canceled("")), ExitCode::Canceled);
    }
}
