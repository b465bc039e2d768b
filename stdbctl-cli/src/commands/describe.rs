//! Describe command - list a module's reducers.

use anyhow::Result;
use clap::Args;

use super::{exit_code_for, resolve_module, AppContext};
use crate::ExitCode;

/// Arguments for the describe command.
#[derive(Args)]
pub struct DescribeArgs {
    /// Module name (defaults to the last published module).
    pub module: Option<String>,

    /// Identity to describe the module as.
    #[arg(long)]
    pub as_identity: Option<String>,
}

/// Runs the describe command.
pub async fn run(args: &DescribeArgs, ctx: &AppContext) -> Result<ExitCode> {
    let module = resolve_module(args.module.as_deref(), ctx).await?;
    let description = ctx
        .cli
        .describe_module(&module, args.as_identity.as_deref())
        .await?;
    ctx.emit(&description, |text| text.format_description(&description))?;
    Ok(exit_code_for(&description.result))
}
