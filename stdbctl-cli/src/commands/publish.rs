//! Publish command - build and publish a server module.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use stdbctl_core::PublishRequest;
use tracing::warn;

use super::{exit_code_for, resolve_module, AppContext};
use crate::ExitCode;

/// Arguments for the publish command.
#[derive(Args)]
pub struct PublishArgs {
    /// Path to the server module project.
    pub project_path: PathBuf,

    /// Module name (defaults to the last published module).
    pub module: Option<String>,

    /// Delete all data in the database first.
    #[arg(long)]
    pub clear: bool,

    /// Build in debug mode.
    #[arg(long)]
    pub debug: bool,
}

/// Runs the publish command.
pub async fn run(args: &PublishArgs, ctx: &AppContext) -> Result<ExitCode> {
    let module = resolve_module(args.module.as_deref(), ctx).await?;
    let request = PublishRequest::new(module, args.project_path.clone())
        .with_clear_data(args.clear)
        .with_debug(args.debug);

    let outcome = ctx.cli.publish(&request).await?;
    if outcome.is_success {
        ctx.store
            .remember_module(&request.module_name, request.project_path.clone())
            .await?;
        if let Err(e) = ctx.publish_cache.record(&outcome).await {
            warn!(error = %e, "Failed to cache publish result");
        }
    }

    ctx.emit(&outcome, |text| text.format_publish(&outcome))?;
    Ok(if outcome.is_success {
        ExitCode::Success
    } else {
        match exit_code_for(&outcome.result) {
            ExitCode::Success => ExitCode::CliFailed,
            code => code,
        }
    })
}
