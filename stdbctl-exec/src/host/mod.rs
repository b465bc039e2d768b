//! Host APIs for running the CLI.
//!
//! - [`process`] - Shell subprocess execution with cancellation

pub mod process;

pub use process::ProcessRunner;
