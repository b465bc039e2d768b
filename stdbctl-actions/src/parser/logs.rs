//! `logs` output.

use regex::Regex;
use std::sync::LazyLock;

use stdbctl_core::{CliResult, LogLevel, LogLine, ModuleLogs};

use super::common::clean;

static LEVEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(ERROR|WARNING|WARN|INFO)\s*:").expect("Invalid regex"));

fn level_of(line: &str) -> LogLevel {
    match LEVEL_RE.captures(line).map(|caps| caps[1].to_string()).as_deref() {
        Some("ERROR") => LogLevel::Error,
        Some("WARNING" | "WARN") => LogLevel::Warning,
        Some("INFO") => LogLevel::Info,
        _ => LogLevel::Other,
    }
}

/// Parses module logs, tagging each non-blank line with its level.
pub fn parse_logs(module_name: &str, result: CliResult) -> ModuleLogs {
    let lines = clean(&result.output)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| LogLine {
            level: level_of(line),
            text: line.trim_end().to_string(),
        })
        .collect();

    ModuleLogs {
        module_name: module_name.to_string(),
        lines,
        result,
    }
}
