//! Generate command - client bindings for a module.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use stdbctl_core::GenerateRequest;
use stdbctl_store::publish_age;
use tracing::debug;

use super::{exit_code_for, AppContext};
use crate::ExitCode;

/// Arguments for the generate command.
#[derive(Args)]
pub struct GenerateArgs {
    /// Server module project (defaults to the last published project).
    #[arg(long)]
    pub project_path: Option<PathBuf>,

    /// Output directory (defaults to the configured one).
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Client language (defaults to the configured one).
    #[arg(long)]
    pub lang: Option<String>,
}

/// Runs the generate command.
pub async fn run(args: &GenerateArgs, ctx: &AppContext) -> Result<ExitCode> {
    let settings = ctx.store.get().await;

    let project_path = match &args.project_path {
        Some(path) => path.clone(),
        None => last_project_path(ctx)
            .await
            .or(settings.last_project_path)
            .ok_or_else(|| anyhow::anyhow!("No project path given and nothing published yet"))?,
    };
    let out_dir = args
        .out_dir
        .clone()
        .or(settings.generate_out_dir)
        .ok_or_else(|| {
            anyhow::anyhow!("No output directory; pass --out-dir or set generate_out_dir")
        })?;
    let lang = args.lang.clone().unwrap_or(settings.generate_lang);

    let request = GenerateRequest::new(project_path, out_dir).with_lang(lang);
    let outcome = ctx.cli.generate_client_files(&request).await?;
    ctx.emit(&outcome, |text| text.format_generate(&outcome))?;
    Ok(exit_code_for(&outcome.result))
}

/// Project path of the cached publish.
async fn last_project_path(ctx: &AppContext) -> Option<PathBuf> {
    let outcome = ctx.publish_cache.load().await?;
    debug!(
        module = %outcome.request.module_name,
        age_minutes = publish_age(&outcome, Utc::now()).num_minutes(),
        "Using cached publish"
    );
    Some(outcome.request.project_path)
}
