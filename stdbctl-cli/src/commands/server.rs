//! Server command - list, add, ping, start and stop servers.

use anyhow::Result;
use clap::{Args, Subcommand};
use stdbctl_actions::setup;
use stdbctl_core::{AddErrorKind, AddServerRequest};
use tracing::info;

use super::{exit_code_for, AppContext};
use crate::ExitCode;

/// Arguments for the server command.
#[derive(Args)]
pub struct ServerArgs {
    #[command(subcommand)]
    pub action: ServerAction,
}

/// Server subcommands.
#[derive(Subcommand)]
pub enum ServerAction {
    /// List configured servers.
    #[command(visible_alias = "ls")]
    List,

    /// Ping a server (the default server when omitted).
    Ping {
        /// Server nickname or URL.
        server: Option<String>,

        /// Keep pinging until the server answers or the deadline passes.
        #[arg(long)]
        wait: bool,
    },

    /// Add a server and make it the default.
    Add {
        /// Server nickname.
        nickname: String,

        /// Server URL.
        url: String,

        /// Do not fetch the server's fingerprint.
        #[arg(long)]
        no_fingerprint: bool,
    },

    /// Set the default server.
    SetDefault {
        /// Server nickname or host.
        server: String,
    },

    /// Make sure a default server exists, adding local and testnet if needed.
    Ensure,

    /// Start the local server and wait for it.
    Start,

    /// Kill whatever listens on the local server port.
    Stop {
        /// Port to free (defaults to the configured port).
        #[arg(long)]
        port: Option<u16>,
    },

    /// Fetch and save a server's fingerprint.
    Fingerprint {
        /// Server nickname.
        server: String,
    },
}

/// Runs the server command.
pub async fn run(args: &ServerArgs, ctx: &AppContext) -> Result<ExitCode> {
    match &args.action {
        ServerAction::List => list(ctx).await,
        ServerAction::Ping { server, wait } => ping(server.as_deref(), *wait, ctx).await,
        ServerAction::Add {
            nickname,
            url,
            no_fingerprint,
        } => add(nickname, url, *no_fingerprint, ctx).await,
        ServerAction::SetDefault { server } => {
            let result = ctx.cli.set_default_server(server).await?;
            ctx.emit(&result, |text| {
                text.format_result("server set-default", &result, &format!("Default server: {server}"))
            })?;
            Ok(exit_code_for(&result))
        }
        ServerAction::Ensure => {
            let server = setup::ensure_default_server(&ctx.cli).await?;
            ctx.emit(&server, |_| format!("Default server: {server}"))?;
            Ok(ExitCode::Success)
        }
        ServerAction::Start => start(ctx).await,
        ServerAction::Stop { port } => {
            let result = ctx.cli.force_stop_local_server(*port).await?;
            ctx.emit(&result, |text| {
                text.format_result("stop", &result, "Local server stopped")
            })?;
            Ok(ExitCode::Success)
        }
        ServerAction::Fingerprint { server } => {
            let result = ctx.cli.create_fingerprint(server).await?;
            ctx.emit(&result, |text| {
                text.format_result("fingerprint", &result, &format!("Saved fingerprint for {server}"))
            })?;
            Ok(exit_code_for(&result))
        }
    }
}

async fn list(ctx: &AppContext) -> Result<ExitCode> {
    let listing = ctx.cli.list_servers().await?;
    ctx.emit(&listing, |text| text.format_servers(&listing))?;
    Ok(exit_code_for(&listing.result))
}

async fn ping(server: Option<&str>, wait: bool, ctx: &AppContext) -> Result<ExitCode> {
    let outcome = if wait {
        ctx.cli
            .ping_until_online(server, Some(ctx.cancel.clone()))
            .await?
    } else {
        ctx.cli.ping(server, None).await?
    };

    let label = server.unwrap_or("default");
    ctx.emit(&outcome, |text| text.format_ping(label, &outcome))?;
    Ok(if outcome.is_online {
        ExitCode::Success
    } else {
        exit_code_for(&outcome.result)
    })
}

async fn add(nickname: &str, url: &str, no_fingerprint: bool, ctx: &AppContext) -> Result<ExitCode> {
    let mut request = AddServerRequest::new(nickname, url);
    if no_fingerprint {
        request = request.without_fingerprint();
    }
    let outcome = ctx.cli.add_server(&request).await?;

    ctx.emit(&outcome, |text| match outcome.error_kind {
        Some(AddErrorKind::AlreadyExists) => {
            text.format_error("server add", &format!("'{nickname}' already exists"))
        }
        _ => text.format_result("server add", &outcome.result, &format!("Added server {nickname}")),
    })?;
    Ok(exit_code_for(&outcome.result))
}

async fn start(ctx: &AppContext) -> Result<ExitCode> {
    let outcome = ctx.cli.start_local_server_and_wait().await?;
    if outcome.is_online {
        info!(elapsed = ?outcome.elapsed, "Local server online");
    }

    let label = ctx.cli.settings().local.name.clone();
    ctx.emit(&outcome, |text| text.format_ping(&label, &outcome))?;
    Ok(if outcome.is_online {
        ExitCode::Success
    } else {
        ExitCode::Canceled
    })
}
