//! Call command - invoke a reducer.

use anyhow::Result;
use clap::Args;
use tracing::warn;

use super::{exit_code_for, resolve_module, AppContext};
use crate::ExitCode;

/// Arguments for the call command.
#[derive(Args)]
pub struct CallArgs {
    /// Reducer name.
    pub reducer: String,

    /// Reducer arguments.
    pub args: Vec<String>,

    /// Module name (defaults to the last published module).
    #[arg(long, short)]
    pub module: Option<String>,
}

/// Runs the call command.
pub async fn run(args: &CallArgs, ctx: &AppContext) -> Result<ExitCode> {
    let module = resolve_module(args.module.as_deref(), ctx).await?;

    // Check arity when the module can be described; calling still works if not.
    let description = ctx.cli.describe_module(&module, None).await?;
    if let Some(reducer) = description.structure.reducer(&args.reducer) {
        if !reducer.accepts_input(&args.args.join(" ")) {
            anyhow::bail!(
                "{} expects arguments: {}",
                reducer.name,
                reducer.syntax_hints().join(", ")
            );
        }
    } else if description.structure.has_reducers() {
        warn!(reducer = %args.reducer, module = %module, "Reducer not found in module");
    }

    let result = ctx.cli.call_reducer(&module, &args.reducer, &args.args).await?;
    ctx.emit(&result, |text| {
        text.format_result("call", &result, &format!("Called {}", args.reducer))
    })?;
    Ok(exit_code_for(&result))
}
