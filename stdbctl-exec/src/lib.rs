// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # stdbctl Exec
//!
//! Process execution for the SpacetimeDB command line tool.
//!
//! ## Host APIs
//!
//! - [`host::process`] - Runs command lines through the platform shell,
//!   with cancellation, deadlines, graceful termination and search path
//!   injection for freshly installed tools
//!
//! ## Building Blocks
//!
//! - [`platform::Platform`] - Shell, installer and port-kill commands per OS
//! - [`invocation::CliInvocation`] - What to run and how to stop it
//! - [`executor::CommandExecutor`] - Trait seam used by higher layers
//! - [`poll::PollSchedule`] - Fixed-interval polling with a deadline
//!
//! ## Example
//!
//! ```ignore
//! use stdbctl_exec::{CliInvocation, ProcessRunner};
//! use std::time::Duration;
//!
//! let runner = ProcessRunner::new()?;
//! let result = runner
//!     .run(&CliInvocation::new("spacetime version").with_timeout(Duration::from_secs(5)))
//!     .await?;
//! println!("{}", result.output);
//! ```

pub mod error;
pub mod executor;
pub mod host;
pub mod invocation;
pub mod output;
pub mod platform;
pub mod poll;
pub mod settings;

// Re-export key types at crate root

pub use error::ExecError;
pub use executor::CommandExecutor;
pub use host::process::ProcessRunner;
pub use invocation::CliInvocation;
pub use output::{extract_error_lines, strip_ansi};
pub use platform::Platform;
pub use poll::PollSchedule;
pub use settings::RunnerSettings;

pub use tokio_util::sync::CancellationToken;
