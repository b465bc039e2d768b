//! Identity command - list, create and select identities.

use anyhow::Result;
use clap::{Args, Subcommand};
use stdbctl_actions::setup;
use stdbctl_core::{AddErrorKind, AddIdentityRequest};

use super::{exit_code_for, AppContext};
use crate::ExitCode;

/// Arguments for the identity command.
#[derive(Args)]
pub struct IdentityArgs {
    #[command(subcommand)]
    pub action: IdentityAction,
}

/// Identity subcommands.
#[derive(Subcommand)]
pub enum IdentityAction {
    /// List identities.
    #[command(visible_alias = "ls")]
    List,

    /// Create a new default identity.
    New {
        /// Identity nickname.
        name: String,

        /// Email address.
        email: String,
    },

    /// Set the default identity.
    SetDefault {
        /// Identity nickname or hash.
        identity: String,
    },

    /// Make sure a default identity is selected.
    Ensure,
}

/// Runs the identity command.
pub async fn run(args: &IdentityArgs, ctx: &AppContext) -> Result<ExitCode> {
    match &args.action {
        IdentityAction::List => {
            let listing = ctx.cli.list_identities().await?;
            ctx.emit(&listing, |text| text.format_identities(&listing))?;
            Ok(exit_code_for(&listing.result))
        }
        IdentityAction::New { name, email } => {
            let outcome = ctx
                .cli
                .add_identity(&AddIdentityRequest::new(name, email))
                .await?;
            ctx.emit(&outcome, |text| match outcome.error_kind {
                Some(AddErrorKind::AlreadyExists) => {
                    text.format_error("identity new", &format!("'{name}' already exists"))
                }
                _ => text.format_result("identity new", &outcome.result, &format!("Created identity {name}")),
            })?;
            Ok(exit_code_for(&outcome.result))
        }
        IdentityAction::SetDefault { identity } => {
            let result = ctx.cli.set_default_identity(identity).await?;
            ctx.emit(&result, |text| {
                text.format_result(
                    "identity set-default",
                    &result,
                    &format!("Default identity: {identity}"),
                )
            })?;
            Ok(exit_code_for(&result))
        }
        IdentityAction::Ensure => match setup::ensure_default_identity(&ctx.cli).await? {
            Some(identity) => {
                ctx.emit(&identity, |_| format!("Default identity: {identity}"))?;
                Ok(ExitCode::Success)
            }
            None => {
                ctx.emit(&serde_json::Value::Null, |text| {
                    text.format_error("identity", "none exists; create one with `stdbctl identity new`")
                })?;
                Ok(ExitCode::Error)
            }
        },
    }
}
