//! `list <identity>` output.

use regex::Regex;
use std::sync::LazyLock;

use stdbctl_core::{CliResult, DatabaseAddresses};

use super::common::clean;

/// A line holding only a hex address.
static ADDRESS_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([0-9a-fA-F]{16,})\s*$").expect("Invalid regex"));

/// Parses the database addresses owned by `identity`.
///
/// Only addresses are printed; database names are not available.
pub fn parse_database_addresses(identity: &str, result: CliResult) -> DatabaseAddresses {
    let addresses = if result.has_error() {
        Vec::new()
    } else {
        clean(&result.output)
            .lines()
            .filter_map(|line| ADDRESS_LINE_RE.captures(line))
            .map(|caps| caps[1].to_string())
            .filter(|address| address != identity)
            .collect()
    };

    DatabaseAddresses {
        identity: identity.to_string(),
        addresses,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addresses() {
        let output = "Associated database addresses for 93dda09db9a56d8fa6c024d843e805d8:\n\
                      \x20 c2006f0b3c8e3a9d4c1f5d4b8f0c2f51\n\
                      \x20 c200a1b2c3d4e5f60718293a4b5c6d7e\n";
        let parsed = parse_database_addresses(
            "93dda09db9a56d8fa6c024d843e805d8",
            CliResult::new(output, ""),
        );
        assert_eq!(
            parsed.addresses,
            vec![
                "c2006f0b3c8e3a9d4c1f5d4b8f0c2f51".to_string(),
                "c200a1b2c3d4e5f60718293a4b5c6d7e".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_addresses() {
        let parsed = parse_database_addresses("abc", CliResult::new("", "Error: unknown identity"));
        assert!(!parsed.has_addresses());
    }
}
