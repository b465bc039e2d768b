// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # stdbctl Store
//!
//! Persistent state for stdbctl.
//!
//! This crate provides:
//!
//! - **SettingsStore**: User preferences, including the last published module
//! - **PublishCache**: The last successful publish result
//! - **StorePaths** / **JsonFile**: Where files live (`STDBCTL_HOME` overrides)
//!   and owner-only atomic JSON writes
//!
//! ## Usage
//!
//! ```ignore
//! use stdbctl_store::SettingsStore;
//!
//! let store = SettingsStore::load_default().await;
//! store.set("port", "4000").await?;
//! store.save().await?;
//!
//! let cli = SpacetimeCli::with_settings(executor, store.get().await.action_settings());
//! ```

pub mod error;
pub mod persistence;
pub mod publish_cache;
pub mod settings_store;

pub use error::StoreError;
pub use persistence::{JsonFile, StorePaths, HOME_ENV};
pub use publish_cache::{publish_age, PublishCache};
pub use settings_store::{LogLevel, Settings, SettingsStore};

#[cfg(test)]
mod persistence_tests;
