//! Logs command.

use anyhow::Result;
use clap::Args;
use stdbctl_core::LogLevel;

use super::{exit_code_for, resolve_module, AppContext};
use crate::ExitCode;

/// Arguments for the logs command.
#[derive(Args)]
pub struct LogsArgs {
    /// Module name (defaults to the last published module).
    pub module: Option<String>,

    /// Only show error and warning lines.
    #[arg(long)]
    pub problems: bool,
}

/// Runs the logs command.
pub async fn run(args: &LogsArgs, ctx: &AppContext) -> Result<ExitCode> {
    let module = resolve_module(args.module.as_deref(), ctx).await?;
    let mut logs = ctx.cli.get_logs(&module).await?;
    if args.problems {
        logs.lines
            .retain(|line| matches!(line.level, LogLevel::Error | LogLevel::Warning));
    }
    ctx.emit(&logs, |text| text.format_logs(&logs))?;
    Ok(exit_code_for(&logs.result))
}
