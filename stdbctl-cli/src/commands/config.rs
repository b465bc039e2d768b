//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use stdbctl_store::{Settings, SettingsStore, StorePaths, HOME_ENV};
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Set a configuration value. An empty value clears optional fields.
    Set {
        /// Setting name (see `config keys`).
        key: String,

        /// New value.
        value: String,
    },

    /// List setting names.
    Keys,

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli, store: &SettingsStore) -> Result<ExitCode> {
    match &args.action {
        ConfigAction::Show => show_config(cli, store).await?,
        ConfigAction::Path => show_paths(cli)?,
        ConfigAction::Set { key, value } => set_value(key, value, store).await?,
        ConfigAction::Keys => {
            for key in Settings::KEYS {
                println!("{key}");
            }
        }
        ConfigAction::Reset => reset_config(store).await?,
    }
    Ok(ExitCode::Success)
}

async fn show_config(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let settings = store.get().await;

    match cli.format {
        OutputFormat::Text => {
            let value = serde_json::to_value(&settings)?;
            println!("stdbctl Configuration");
            println!("{}", "─".repeat(40));
            println!();
            if let Some(map) = value.as_object() {
                for key in Settings::KEYS {
                    let shown = match map.get(*key) {
                        Some(serde_json::Value::String(s)) => s.clone(),
                        Some(serde_json::Value::Null) | None => "-".to_string(),
                        Some(other) => other.to_string(),
                    };
                    println!("{key:<20} {shown}");
                }
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&settings)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let paths = StorePaths::resolve();
    let settings_path = paths.settings_file();
    let cache_path = paths.publish_cache_file();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", paths.config_dir.display());
            println!("Cache dir:     {}", paths.cache_dir.display());
            println!("Settings file: {}", settings_path.display());
            println!("Publish cache: {}", cache_path.display());
            if std::env::var_os(HOME_ENV).is_some_and(|home| !home.is_empty()) {
                println!();
                println!("Relocated by {HOME_ENV}");
            }
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": paths.config_dir.display().to_string(),
                "cache_dir": paths.cache_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
                "publish_cache": cache_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn set_value(key: &str, value: &str, store: &SettingsStore) -> Result<()> {
    store.set(key, value).await?;
    store.save().await?;

    info!(key, value, "Setting updated");
    println!("{key} = {value}");
    Ok(())
}

async fn reset_config(store: &SettingsStore) -> Result<()> {
    let path = store.path();

    if path.exists() {
        tokio::fs::remove_file(path).await?;
        store.reset().await;
        info!(path = %path.display(), "Settings reset");
        println!("Configuration reset to defaults");
    } else {
        println!("No configuration file to reset");
    }

    Ok(())
}
