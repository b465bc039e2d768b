// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! stdbctl - drive the SpacetimeDB CLI from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Is the CLI installed, are the servers reachable?
//! stdbctl check
//!
//! # Install the CLI and pick testnet as default server
//! stdbctl install
//!
//! # Start the local server and wait for it
//! stdbctl server start
//!
//! # Publish a module, then generate client bindings for it
//! stdbctl publish ./server quickstart-chat
//! stdbctl generate --out-dir ./client/autogen
//!
//! # JSON output
//! stdbctl server list --format json --pretty
//! ```

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use stdbctl_store::{LogLevel, SettingsStore};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{
    call, check, config, dbs, describe, generate, identity, install, logs, publish, server,
    AppContext,
};

// ============================================================================
// CLI Definition
// ============================================================================

/// stdbctl - SpacetimeDB CLI orchestration.
#[derive(Parser)]
#[command(name = "stdbctl")]
#[command(about = "Drive the SpacetimeDB command line tool")]
#[command(long_about = r#"
stdbctl runs the SpacetimeDB CLI (`spacetime`) for you, recovers from a
missing local fingerprint or a stopped local server, and prints the
results as text or JSON.

Examples:
  stdbctl check                           # Installed? Servers online?
  stdbctl server ping local --wait        # Wait for the local server
  stdbctl publish ./server chat --clear   # Publish and wipe data
  stdbctl describe chat                   # List reducers
  stdbctl call send_message "hi" -m chat  # Call a reducer
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// CLI program to run instead of the configured one.
    #[arg(long, global = true)]
    pub program: Option<String>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Check the CLI install and server reachability.
    Check(check::CheckArgs),

    /// Install the CLI and configure default servers.
    Install,

    /// Manage servers.
    #[command(visible_alias = "s")]
    Server(server::ServerArgs),

    /// Manage identities.
    #[command(visible_alias = "i")]
    Identity(identity::IdentityArgs),

    /// List databases owned by an identity.
    Dbs(dbs::DbsArgs),

    /// Describe a module's reducers.
    Describe(describe::DescribeArgs),

    /// Show a module's logs.
    Logs(logs::LogsArgs),

    /// Build and publish a server module.
    #[command(visible_alias = "p")]
    Publish(publish::PublishArgs),

    /// Generate client bindings.
    #[command(visible_alias = "g")]
    Generate(generate::GenerateArgs),

    /// Call a reducer.
    Call(call::CallArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// The SpacetimeDB CLI is not installed.
    NotInstalled = 2,
    /// The SpacetimeDB CLI reported an error.
    CliFailed = 3,
    /// Canceled or timed out.
    Canceled = 4,
    /// Installed, but a new shell is needed to find it.
    RestartRequired = 5,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("stdbctl=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("stdbctl={level}")))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let store = SettingsStore::load_default().await;
    setup_logging(cli.verbose, cli.quiet, store.get().await.log_level);

    let result = match &cli.command {
        Commands::Config(args) => config::run(args, &cli, &store).await,
        command => match AppContext::new(&cli, store).await {
            Ok(ctx) => dispatch(command, &cli, &ctx).await,
            Err(e) => Err(e),
        },
    };

    let code = result.unwrap_or_else(|e| {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        ExitCode::Error
    });
    std::process::exit(code as i32);
}

async fn dispatch(command: &Commands, cli: &Cli, ctx: &AppContext) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Check(args) => check::run(args, ctx).await,
        Commands::Install => install::run(ctx).await,
        Commands::Server(args) => server::run(args, ctx).await,
        Commands::Identity(args) => identity::run(args, ctx).await,
        Commands::Dbs(args) => dbs::run(args, ctx).await,
        Commands::Describe(args) => describe::run(args, ctx).await,
        Commands::Logs(args) => logs::run(args, ctx).await,
        Commands::Publish(args) => publish::run(args, ctx).await,
        Commands::Generate(args) => generate::run(args, ctx).await,
        Commands::Call(args) => call::run(args, ctx).await,
        Commands::Config(args) => config::run(args, cli, &ctx.store).await,
    }
}
