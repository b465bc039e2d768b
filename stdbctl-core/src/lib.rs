// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # stdbctl Core
//!
//! Core types and models for driving the SpacetimeDB command line tool.
//!
//! This crate holds the data that flows between the process runner, the
//! output parsers and whichever front end renders results:
//!
//! - Raw results of a CLI invocation
//! - Typed records parsed from CLI output
//! - Request types for mutating actions
//! - Error types
//!
//! ## Key Types
//!
//! ### Raw Results
//! - [`CliResult`] - Captured stdout/stderr of one invocation
//!
//! ### Listings
//! - [`ServerRecord`] / [`IdentityRecord`] - Configured servers and identities
//! - [`Listing`] - Ordered records with default lookup
//!
//! ### Outcomes
//! - [`PingOutcome`] - Server reachability
//! - [`PublishOutcome`] - Result of publishing a module
//! - [`GenerateOutcome`] - Result of client code generation
//! - [`EntityStructure`] - Reducers exposed by a module

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Raw results
    clip,
    CliResult,
    CANCELED_SENTINEL,
    // Listings
    IdentityListing,
    IdentityRecord,
    Listing,
    ListingEntry,
    ServerListing,
    ServerRecord,
    // Server
    DatabaseAddresses,
    OfflineReason,
    PingOutcome,
    // Publish
    GenerateOutcome,
    GenerateRequest,
    PublishErrorKind,
    PublishOutcome,
    PublishRequest,
    // Module
    EntityStructure,
    LogLevel,
    LogLine,
    ModuleDescription,
    ModuleLogs,
    ReducerInfo,
    ReducerParam,
    // Setup
    AddErrorKind,
    AddIdentityOutcome,
    AddIdentityRequest,
    AddServerOutcome,
    AddServerRequest,
    InstallOutcome,
    VersionInfo,
};
