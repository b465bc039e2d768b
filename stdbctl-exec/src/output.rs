//! Error line extraction from captured output.
//!
//! Build tools invoked by `publish` print errors in several shapes:
//! `error: ...`, `error[E0425]: ...`, `Foo.cs(12,5): error CS1002: ...`.
//! Every such line is collected once, in order, with ANSI styling removed.

use regex::Regex;
use std::sync::LazyLock;

static ERROR_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\berror(?:\s*\[?[a-z]*\d+\]?)?\s*:\s*\S").expect("Invalid regex")
});

/// Removes ANSI escape sequences.
pub fn strip_ansi(text: &str) -> String {
    String::from_utf8_lossy(&strip_ansi_escapes::strip(text)).into_owned()
}

/// Collects distinct error lines from stdout then stderr.
pub fn extract_error_lines(stdout: &str, stderr: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for stream in [stdout, stderr] {
        let clean = strip_ansi(stream);
        for line in clean.lines() {
            let line = line.trim();
            if ERROR_LINE_RE.is_match(line) && !found.iter().any(|f| f == line) {
                found.push(line.to_string());
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_compiler_errors() {
        let stdout = "Compiling\n\
            /srv/Lib.cs(12,5): error CS1002: ; expected [/srv/StdbModule.csproj]\n\
            Build FAILED.\n\
                0 Warning(s)\n\
                1 Error(s)\n";
        let stderr = "\x1b[31merror\x1b[0m: failed to build module\n";

        let errors = extract_error_lines(stdout, stderr);
        assert_eq!(
            errors,
            vec![
                "/srv/Lib.cs(12,5): error CS1002: ; expected [/srv/StdbModule.csproj]".to_string(),
                "error: failed to build module".to_string(),
            ]
        );
    }

    #[test]
    fn test_rust_style_code() {
        let errors = extract_error_lines("error[E0425]: cannot find value `x`", "");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_duplicates_collapsed() {
        let errors = extract_error_lines("Error: boom\n", "Error: boom\n");
        assert_eq!(errors, vec!["Error: boom".to_string()]);
    }

    #[test]
    fn test_no_errors() {
        assert!(extract_error_lines("all good\nwarning: unused", "").is_empty());
    }
}
