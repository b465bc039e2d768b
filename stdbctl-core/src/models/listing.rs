//! Server and identity listings.
//!
//! Both `server list` and `identity list` print a table with one row per
//! configured entry and a marker on the default one. They share [`Listing`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::cli::CliResult;

// ============================================================================
// Listing Entry
// ============================================================================

/// A record that can appear in a listing.
pub trait ListingEntry {
    /// Nickname used to address the record on the CLI.
    fn nickname(&self) -> &str;

    /// Whether the CLI marks this record as default.
    fn is_default(&self) -> bool;
}

// ============================================================================
// Server Record
// ============================================================================

/// A server configured in the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    /// Nickname (e.g. `local`, `testnet`).
    pub nickname: String,
    /// Host, with or without scheme (e.g. `127.0.0.1:3000`).
    pub host: String,
    /// Protocol column, when printed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Whether this is the default server.
    pub is_default: bool,
}

impl ServerRecord {
    /// Creates a new server record.
    pub fn new(nickname: impl Into<String>, host: impl Into<String>, is_default: bool) -> Self {
        Self {
            nickname: nickname.into(),
            host: host.into(),
            protocol: None,
            is_default,
        }
    }

    /// Returns the host as a URL, adding the protocol when known.
    pub fn url(&self) -> String {
        if self.host.contains("://") {
            return self.host.clone();
        }
        match &self.protocol {
            Some(protocol) => format!("{protocol}://{}", self.host),
            None => self.host.clone(),
        }
    }
}

impl ListingEntry for ServerRecord {
    fn nickname(&self) -> &str {
        &self.nickname
    }

    fn is_default(&self) -> bool {
        self.is_default
    }
}

impl fmt::Display for ServerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.nickname, self.url())?;
        if self.is_default {
            write!(f, " [default]")?;
        }
        Ok(())
    }
}

// ============================================================================
// Identity Record
// ============================================================================

/// An identity configured in the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Nickname, or the identity hash when no name is set.
    pub nickname: String,
    /// Hex identity, when printed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    /// Email, when printed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Whether this is the default identity.
    pub is_default: bool,
}

impl IdentityRecord {
    /// Creates a new identity record.
    pub fn new(nickname: impl Into<String>, is_default: bool) -> Self {
        Self {
            nickname: nickname.into(),
            identity: None,
            email: None,
            is_default,
        }
    }
}

impl ListingEntry for IdentityRecord {
    fn nickname(&self) -> &str {
        &self.nickname
    }

    fn is_default(&self) -> bool {
        self.is_default
    }
}

impl fmt::Display for IdentityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.nickname)?;
        if self.is_default {
            write!(f, " [default]")?;
        }
        Ok(())
    }
}

// ============================================================================
// Listing
// ============================================================================

/// Parsed records in source line order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing<T> {
    /// Records, in the order the CLI printed them.
    pub records: Vec<T>,
    /// The raw result the listing was parsed from.
    pub result: CliResult,
}

/// Servers from `server list`.
pub type ServerListing = Listing<ServerRecord>;

/// Identities from `identity list`.
pub type IdentityListing = Listing<IdentityRecord>;

impl<T: ListingEntry> Listing<T> {
    /// Creates a listing.
    pub fn new(records: Vec<T>, result: CliResult) -> Self {
        Self { records, result }
    }

    /// Creates an empty listing for a failed or unparseable result.
    pub fn empty(result: CliResult) -> Self {
        Self {
            records: Vec::new(),
            result,
        }
    }

    /// Returns true if at least one record was found.
    pub fn has_records(&self) -> bool {
        !self.records.is_empty()
    }

    /// Index of the default record, if any.
    pub fn default_index(&self) -> Option<usize> {
        self.records.iter().position(ListingEntry::is_default)
    }

    /// The default record, if any.
    pub fn default_record(&self) -> Option<&T> {
        self.default_index().map(|i| &self.records[i])
    }

    /// Records were found but none is marked default.
    ///
    /// Callers resolve this by picking index 0 and setting it through the CLI.
    pub fn found_but_no_default(&self) -> bool {
        self.has_records() && self.default_index().is_none()
    }

    /// Looks up a record by nickname.
    pub fn find(&self, nickname: &str) -> Option<&T> {
        self.records.iter().find(|r| r.nickname() == nickname)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the listing holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
