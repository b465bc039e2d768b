//! Domain models for stdbctl.
//!
//! This module contains the typed results produced from `spacetime` CLI
//! output, plus the request types the high-level actions accept.
//!
//! ## Submodules
//!
//! - [`cli`] - Raw invocation results (`CliResult`)
//! - [`listing`] - Server and identity listings
//! - [`server`] - Ping outcomes and database addresses
//! - [`publish`] - Publish and code generation
//! - [`module`] - Reducer structure and module logs
//! - [`setup`] - Install, version and add-identity/server results

mod cli;
mod listing;
mod module;
mod publish;
mod server;
mod setup;

// Re-export everything at the models level
pub use cli::{clip, CliResult, CANCELED_SENTINEL};
pub use listing::{
    IdentityListing, IdentityRecord, Listing, ListingEntry, ServerListing, ServerRecord,
};
pub use module::{
    EntityStructure, LogLevel, LogLine, ModuleDescription, ModuleLogs, ReducerInfo, ReducerParam,
};
pub use publish::{
    GenerateOutcome, GenerateRequest, PublishErrorKind, PublishOutcome, PublishRequest,
};
pub use server::{DatabaseAddresses, OfflineReason, PingOutcome};
pub use setup::{
    AddErrorKind, AddIdentityOutcome, AddIdentityRequest, AddServerOutcome, AddServerRequest,
    InstallOutcome, VersionInfo,
};
