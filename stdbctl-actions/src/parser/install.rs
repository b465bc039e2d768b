//! `version` and installer output.

use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

use stdbctl_core::{CliResult, InstallOutcome, VersionInfo};

use super::common::{clean, contains_ignore_case};

/// First `x.y.z` version number.
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+\.\d+\.\d+)\b").expect("Invalid regex"));

/// Installer line naming the install directory.
static INSTALL_DIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)installed (?:into|in|to):?\s*(.+?)\s*$").expect("Invalid regex")
});

/// Shell messages for an unknown program (`cmd.exe`, bash, sh).
const NOT_FOUND_PHRASES: &[&str] = &[
    "is not recognized as an internal or external command",
    "command not found",
];

/// Returns true if the shell could not find the program.
pub fn is_command_not_found(text: &str) -> bool {
    NOT_FOUND_PHRASES
        .iter()
        .any(|phrase| contains_ignore_case(text, phrase))
}

/// Parses `version` output.
pub fn parse_version(result: CliResult) -> VersionInfo {
    let command_not_found =
        is_command_not_found(&result.error) || is_command_not_found(&result.output);
    let installed = !result.has_error() && !command_not_found;

    let version = if installed {
        VERSION_RE
            .captures(&clean(&result.output))
            .map(|caps| caps[1].to_string())
    } else {
        None
    };

    VersionInfo {
        installed,
        version,
        command_not_found,
        result,
    }
}

/// Parses installer output.
///
/// Success means the installer wrote no error text.
pub fn parse_install(result: CliResult) -> InstallOutcome {
    let text = clean(&result.output);
    let install_dir = INSTALL_DIR_RE.captures(&text).and_then(|caps| {
        let raw = caps[1].trim_matches(|c: char| c == '"' || c == '\'' || c == '.');
        if raw.is_empty() {
            None
        } else {
            Some(PathBuf::from(raw))
        }
    });

    InstallOutcome {
        is_installed: !result.has_error(),
        install_dir,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_installed() {
        let output = "spacetime Path: /home/dev/.cargo/bin/spacetime\n\
                      Commit: 1b2c3d\n\
                      spacetimedb tool version 0.8.2; spacetimedb-lib version 0.8.2;\n";
        let info = parse_version(CliResult::new(output, ""));
        assert!(info.installed);
        assert!(!info.command_not_found);
        assert_eq!(info.version.as_deref(), Some("0.8.2"));
    }

    #[test]
    fn test_version_not_found_bash() {
        let info = parse_version(CliResult::new("", "/bin/bash: line 1: spacetime: command not found\n"));
        assert!(!info.installed);
        assert!(info.command_not_found);
        assert!(info.version.is_none());
    }

    #[test]
    fn test_version_not_found_cmd() {
        let error = "'spacetime' is not recognized as an internal or external command,\r\n\
                     operable program or batch file.\r\n";
        let info = parse_version(CliResult::new("", error));
        assert!(info.command_not_found);
    }

    #[test]
    fn test_install_dir() {
        let output = "Downloading...\nThe SpacetimeDB command line tool will now be installed into: C:\\Users\\dev\\SpacetimeDB\n";
        let outcome = parse_install(CliResult::new(output, ""));
        assert!(outcome.is_installed);
        assert_eq!(
            outcome.install_dir,
            Some(PathBuf::from("C:\\Users\\dev\\SpacetimeDB"))
        );
    }

    #[test]
    fn test_install_failure() {
        let outcome = parse_install(CliResult::new("", "Error: No available formula"));
        assert!(!outcome.is_installed);
        assert!(outcome.install_dir.is_none());
    }
}
