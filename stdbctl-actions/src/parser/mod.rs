//! Parsers for CLI output.
//!
//! Every parser is a total function: any text, including garbage, yields
//! a value (an empty listing, an offline ping, an unclassified failure).
//! ANSI styling is removed before matching.
//!
//! - [`install`] - `version` and installer output
//! - [`listing`] - `server list` / `identity list` tables
//! - [`ping`] - `server ping`
//! - [`publish`] - `publish` classification and addresses
//! - [`generate`] - `generate`
//! - [`describe`] - `describe` JSON
//! - [`addresses`] - `list <identity>`
//! - [`logs`] - `logs`
//! - [`mutation`] - `identity new` / `server add`

mod common;

pub mod addresses;
pub mod describe;
pub mod generate;
pub mod install;
pub mod listing;
pub mod logs;
pub mod mutation;
pub mod ping;
pub mod publish;

pub use addresses::parse_database_addresses;
pub use describe::{parse_describe, parse_entity_structure};
pub use generate::parse_generate;
pub use install::{is_command_not_found, parse_install, parse_version};
pub use listing::{parse_identity_listing, parse_server_listing};
pub use logs::parse_logs;
pub use mutation::{classify_add_error, parse_add_identity, parse_add_server};
pub use ping::{is_connection_refused, parse_ping};
pub use publish::{classify_publish_error, parse_publish};
