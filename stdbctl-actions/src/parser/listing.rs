//! `server list` and `identity list` tables.
//!
//! Both commands print a header row starting with `DEFAULT` followed by one
//! row per entry. The default entry carries `***` in the first column:
//!
//! ```text
//!  DEFAULT  HOSTNAME                 PROTOCOL  NICKNAME
//!      ***  127.0.0.1:3000           http      local
//!           testnet.spacetimedb.com  https     testnet
//! ```
//!
//! Cells are sliced at the header's column offsets so empty cells (an
//! identity without a name) do not shift later columns. Rows that do not
//! line up fall back to whitespace splitting.

use std::collections::HashMap;

use stdbctl_core::{
    CliResult, IdentityListing, IdentityRecord, Listing, ServerListing, ServerRecord,
};
use tracing::debug;

use super::common::clean;

const DEFAULT_HEADER: &str = "DEFAULT";
const DEFAULT_MARKER: &str = "***";

// ============================================================================
// Table
// ============================================================================

/// One parsed table row keyed by upper-case header name.
#[derive(Debug, Default)]
struct Row {
    is_default: bool,
    cells: HashMap<String, String>,
}

impl Row {
    fn cell(&self, names: &[&str]) -> Option<String> {
        names
            .iter()
            .filter_map(|name| self.cells.get(*name))
            .find(|value| !value.is_empty())
            .cloned()
    }
}

/// Header column names with their char offsets.
struct Columns(Vec<(String, usize)>);

impl Columns {
    fn from_header(line: &str) -> Option<Self> {
        let mut columns = Vec::new();
        let mut start = None;
        for (i, c) in line.chars().chain(std::iter::once(' ')).enumerate() {
            match (c.is_whitespace(), start) {
                (false, None) => start = Some(i),
                (true, Some(s)) => {
                    let name: String = line.chars().skip(s).take(i - s).collect();
                    columns.push((name, s));
                    start = None;
                }
                _ => {}
            }
        }
        // Prose such as "Default identity for testnet:" is not a header.
        if columns.first().is_some_and(|(name, _)| name == DEFAULT_HEADER) {
            Some(Self(
                columns
                    .into_iter()
                    .map(|(name, s)| (name.to_uppercase(), s))
                    .collect(),
            ))
        } else {
            None
        }
    }

    /// Slices a row at the header offsets. Returns `None` for lines that
    /// are not table rows (free text in the marker column).
    fn slice(&self, line: &str) -> Option<Row> {
        let chars: Vec<char> = line.chars().collect();
        let cell = |from: usize, to: Option<usize>| -> String {
            let to = to.unwrap_or(chars.len()).min(chars.len());
            if from >= to {
                return String::new();
            }
            chars[from..to].iter().collect::<String>().trim().to_string()
        };

        let next_start = self.0.get(1).map(|(_, s)| *s);
        let marker = cell(0, next_start);
        if !marker.is_empty() && marker != DEFAULT_MARKER {
            return None;
        }

        let mut row = Row {
            is_default: marker == DEFAULT_MARKER,
            cells: HashMap::new(),
        };
        for (i, (name, start)) in self.0.iter().enumerate().skip(1) {
            let end = self.0.get(i + 1).map(|(_, s)| *s);
            row.cells.insert(name.clone(), cell(*start, end));
        }
        Some(row)
    }

    /// Splits a row on whitespace, mapping tokens to columns in order.
    fn split(&self, line: &str) -> Row {
        let mut tokens: Vec<&str> = line.split_whitespace().collect();
        let is_default = tokens.first() == Some(&DEFAULT_MARKER);
        if is_default {
            tokens.remove(0);
        }
        let cells = self
            .0
            .iter()
            .skip(1)
            .zip(tokens)
            .map(|((name, _), value)| (name.clone(), value.to_string()))
            .collect();
        Row { is_default, cells }
    }
}

/// Parses rows below the `DEFAULT` header. `key` names the columns that
/// must be non-empty for a sliced row to be trusted.
fn parse_rows(text: &str, key: &[&str]) -> Vec<Row> {
    let text = clean(text);
    let mut lines = text.lines();

    let Some(columns) = lines.by_ref().find_map(Columns::from_header) else {
        debug!("No DEFAULT header in listing output");
        return Vec::new();
    };

    let mut rows = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let row = match columns.slice(line) {
            Some(row) if row.cell(key).is_some() => row,
            Some(_) => columns.split(line),
            None if line.trim_start().starts_with(DEFAULT_MARKER) => columns.split(line),
            None => continue,
        };
        if row.cell(key).is_some() {
            rows.push(row);
        }
    }
    rows
}

// ============================================================================
// Servers
// ============================================================================

const HOST_COLUMNS: &[&str] = &["HOSTNAME", "HOST"];
const NICKNAME_COLUMNS: &[&str] = &["NICKNAME", "NAME"];

/// Parses `server list` output.
///
/// Errors and unrecognized output yield an empty listing.
pub fn parse_server_listing(result: CliResult) -> ServerListing {
    if result.has_error() {
        return Listing::empty(result);
    }

    let records = parse_rows(&result.output, HOST_COLUMNS)
        .into_iter()
        .map(|row| {
            let host = row.cell(HOST_COLUMNS).unwrap_or_default();
            let nickname = row.cell(NICKNAME_COLUMNS).unwrap_or_else(|| host.clone());
            ServerRecord {
                nickname,
                host,
                protocol: row.cell(&["PROTOCOL"]),
                is_default: row.is_default,
            }
        })
        .collect();

    Listing::new(records, result)
}

// ============================================================================
// Identities
// ============================================================================

const IDENTITY_COLUMNS: &[&str] = &["IDENTITY"];
const NAME_COLUMNS: &[&str] = &["NAME", "NICKNAME"];

/// Parses `identity list` output.
///
/// Identities without a name use the identity hash as nickname.
pub fn parse_identity_listing(result: CliResult) -> IdentityListing {
    if result.has_error() {
        return Listing::empty(result);
    }

    let records = parse_rows(&result.output, IDENTITY_COLUMNS)
        .into_iter()
        .map(|row| {
            let identity = row.cell(IDENTITY_COLUMNS);
            let nickname = row
                .cell(NAME_COLUMNS)
                .or_else(|| identity.clone())
                .unwrap_or_default();
            IdentityRecord {
                nickname,
                identity,
                email: row.cell(&["EMAIL"]),
                is_default: row.is_default,
            }
        })
        .collect();

    Listing::new(records, result)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SERVERS: &str = " DEFAULT  HOSTNAME                 PROTOCOL  NICKNAME\n\
                           \x20    ***  127.0.0.1:3000           http      local\n\
                           \x20         testnet.spacetimedb.com  https     testnet\n";

    #[test]
    fn test_server_listing() {
        let listing = parse_server_listing(CliResult::new(SERVERS, ""));
        assert_eq!(listing.len(), 2);
        assert_eq!(listing.records[0].nickname, "local");
        assert_eq!(listing.records[0].host, "127.0.0.1:3000");
        assert_eq!(listing.records[0].protocol.as_deref(), Some("http"));
        assert!(listing.records[0].is_default);
        assert_eq!(listing.records[1].nickname, "testnet");
        assert!(!listing.records[1].is_default);
        assert_eq!(listing.default_index(), Some(0));
    }

    #[test]
    fn test_server_listing_no_default() {
        let output = " DEFAULT  HOSTNAME        PROTOCOL  NICKNAME\n\
                      \x20         127.0.0.1:3000  http      local\n";
        let listing = parse_server_listing(CliResult::new(output, ""));
        assert!(listing.found_but_no_default());
    }

    #[test]
    fn test_identity_listing_with_empty_name() {
        let output = "Identities for testnet:\n\
                      \x20DEFAULT  IDENTITY                          NAME   EMAIL\n\
                      \x20***      93dda09db9a56d8fa6c024d843e805d8          dev@example.com\n\
                      \x20         c2009c4e6d1f9a2d07f0e1c95a5ef1b1  alice\n";
        let listing = parse_identity_listing(CliResult::new(output, ""));
        assert_eq!(listing.len(), 2);

        let first = &listing.records[0];
        assert!(first.is_default);
        assert_eq!(first.nickname, "93dda09db9a56d8fa6c024d843e805d8");
        assert_eq!(first.email.as_deref(), Some("dev@example.com"));

        let second = &listing.records[1];
        assert!(!second.is_default);
        assert_eq!(second.nickname, "alice");
        assert_eq!(
            second.identity.as_deref(),
            Some("c2009c4e6d1f9a2d07f0e1c95a5ef1b1")
        );
        assert!(second.email.is_none());
    }

    #[test]
    fn test_prose_line_is_not_header() {
        let output = "Default identity for testnet:\n\
                      \x20DEFAULT  IDENTITY                          NAME   EMAIL\n\
                      \x20***      93dda09db9a56d8fa6c024d843e805d8  dev    dev@example.com\n";
        let listing = parse_identity_listing(CliResult::new(output, ""));
        assert_eq!(listing.len(), 1);
        assert_eq!(listing.records[0].nickname, "dev");
        assert!(listing.records[0].is_default);
    }

    #[test]
    fn test_misaligned_rows_fall_back_to_whitespace() {
        let output = "DEFAULT HOSTNAME PROTOCOL NICKNAME\n*** 127.0.0.1:3000 http local\n";
        let listing = parse_server_listing(CliResult::new(output, ""));
        assert_eq!(listing.len(), 1);
        assert_eq!(listing.records[0].nickname, "local");
        assert!(listing.records[0].is_default);
    }

    #[test]
    fn test_garbage_yields_empty() {
        let listing = parse_server_listing(CliResult::new("¯\\_(ツ)_/¯\nnothing here", ""));
        assert!(listing.is_empty());
        assert!(!listing.found_but_no_default());
    }

    #[test]
    fn test_error_yields_empty() {
        let listing = parse_identity_listing(CliResult::new(
            SERVERS,
            "Error: Cannot list identities for server without a saved fingerprint: local",
        ));
        assert!(listing.is_empty());
        assert!(listing.result.has_error());
    }
}
