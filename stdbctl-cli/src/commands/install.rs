//! Install command - install the CLI and configure defaults.

use anyhow::Result;
use stdbctl_actions::{setup, ActionError};
use tracing::{info, warn};

use super::AppContext;
use crate::ExitCode;

/// Runs the install command.
pub async fn run(ctx: &AppContext) -> Result<ExitCode> {
    let version = match setup::ensure_installed(&ctx.cli).await {
        Ok(version) => version,
        Err(ActionError::RestartRequired) => {
            remember_install_dir(ctx).await?;
            let message = "installed, but this shell cannot find it yet; open a new terminal";
            ctx.emit(&serde_json::json!({ "restart_required": true }), |text| {
                text.format_error("spacetime", message)
            })?;
            return Ok(ExitCode::RestartRequired);
        }
        Err(e) => return Err(e.into()),
    };

    remember_install_dir(ctx).await?;
    ctx.emit(&version, |text| text.format_version(&version))?;
    Ok(ExitCode::Success)
}

/// Saves the directory the installer reported, so later runs find the CLI.
async fn remember_install_dir(ctx: &AppContext) -> Result<()> {
    let Some(dir) = ctx.runner.installed_dir() else {
        return Ok(());
    };
    if ctx.store.get().await.installed_dir.as_ref() == Some(&dir) {
        return Ok(());
    }

    info!(dir = %dir.display(), "Recording install directory");
    ctx.store.update(|s| s.installed_dir = Some(dir)).await;
    if let Err(e) = ctx.store.save().await {
        warn!(error = %e, "Failed to save install directory");
    }
    Ok(())
}
