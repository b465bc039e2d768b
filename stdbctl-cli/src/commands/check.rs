//! Check command - CLI install and server reachability.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use stdbctl_core::{PingOutcome, VersionInfo};
use tracing::info;

use super::AppContext;
use crate::ExitCode;

/// Everything `check` found.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    /// Result of `version`.
    pub version: VersionInfo,
    /// Resolved path of the CLI program, when found.
    pub program_path: Option<String>,
    /// Ping of the local server.
    pub local: PingOutcome,
    /// Ping of the hosted test network.
    pub testnet: PingOutcome,
}

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// Time each server gets to answer, in milliseconds.
    #[arg(long, default_value = "2000")]
    pub timeout_ms: u64,
}

/// Runs the check command.
pub async fn run(args: &CheckArgs, ctx: &AppContext) -> Result<ExitCode> {
    let settings = ctx.cli.settings();
    let local = settings.local.name.clone();
    let testnet = settings.testnet.name.clone();

    let version = ctx.cli.check_installed().await?;
    if !version.installed {
        ctx.emit(&version, |text| text.format_version(&version))?;
        return Ok(ExitCode::NotInstalled);
    }

    let timeout = Duration::from_millis(args.timeout_ms);
    let (local_ping, testnet_ping) = futures::join!(
        ctx.cli.ping_within(Some(&local), timeout, Some(ctx.cancel.clone())),
        ctx.cli.ping_within(Some(&testnet), timeout, Some(ctx.cancel.clone())),
    );
    let report = CheckReport {
        program_path: ctx
            .runner
            .which(ctx.cli.commands().program())
            .map(|p| p.display().to_string()),
        version,
        local: local_ping?,
        testnet: testnet_ping?,
    };
    info!(
        local = report.local.is_online,
        testnet = report.testnet.is_online,
        "Check finished"
    );

    ctx.emit(&report, |text| {
        let mut lines = vec![text.format_version(&report.version)];
        if let Some(path) = &report.program_path {
            lines.push(format!("  {path}"));
        }
        lines.push(text.format_ping(&local, &report.local));
        lines.push(text.format_ping(&testnet, &report.testnet));
        lines.join("\n")
    })?;
    Ok(ExitCode::Success)
}
