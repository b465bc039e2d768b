// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # stdbctl Actions
//!
//! High-level actions over the SpacetimeDB command line tool.
//!
//! - [`cli::SpacetimeCli`] - One method per CLI action, returning typed outcomes
//! - [`parser`] - Total parsers from CLI text to typed values
//! - [`recovery`] - Automatic recovery from known transient failures
//! - [`setup`] - Install and default-selection workflows
//! - [`commands::CliCommands`] - Argument templates
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use stdbctl_actions::SpacetimeCli;
//! use stdbctl_exec::ProcessRunner;
//!
//! let cli = SpacetimeCli::new(Arc::new(ProcessRunner::new()?));
//! let servers = cli.list_servers().await?;
//! for server in &servers.records {
//!     println!("{server}");
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod parser;
pub mod recovery;
pub mod settings;
pub mod setup;

pub use cli::SpacetimeCli;
pub use commands::CliCommands;
pub use error::ActionError;
pub use recovery::{RecoverableError, RecoveryContext, MAX_AUTO_RETRIES};
pub use settings::{
    ActionSettings, ServerTarget, DEFAULT_PORT, DEFAULT_PROGRAM, DEFAULT_START_WAIT,
    LOCAL_SERVER_NAME, LOCAL_SERVER_URL, TESTNET_SERVER_NAME, TESTNET_SERVER_URL,
};
