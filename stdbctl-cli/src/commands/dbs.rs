//! Dbs command - databases owned by an identity.

use anyhow::Result;
use clap::Args;
use stdbctl_actions::setup;

use super::{exit_code_for, AppContext};
use crate::ExitCode;

/// Arguments for the dbs command.
#[derive(Args)]
pub struct DbsArgs {
    /// Identity nickname or hash (defaults to the default identity).
    pub identity: Option<String>,
}

/// Runs the dbs command.
pub async fn run(args: &DbsArgs, ctx: &AppContext) -> Result<ExitCode> {
    let identity = match &args.identity {
        Some(identity) => identity.clone(),
        None => setup::ensure_default_identity(&ctx.cli)
            .await?
            .map(|record| record.identity.unwrap_or(record.nickname))
            .ok_or_else(|| anyhow::anyhow!("No identity exists"))?,
    };

    let addresses = ctx.cli.list_database_addresses(&identity).await?;
    ctx.emit(&addresses, |text| text.format_addresses(&addresses))?;
    Ok(exit_code_for(&addresses.result))
}
