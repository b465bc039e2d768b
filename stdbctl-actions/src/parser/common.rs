//! Shared parsing helpers.

/// Removes ANSI styling and normalizes line endings.
pub(crate) fn clean(text: &str) -> String {
    stdbctl_exec::strip_ansi(text).replace("\r\n", "\n")
}

/// Case-insensitive substring search.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_strips_ansi_and_crlf() {
        assert_eq!(clean("\x1b[1mbold\x1b[0m\r\nnext"), "bold\nnext");
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Connection Refused", "connection refused"));
        assert!(!contains_ignore_case("refused", "connection"));
    }
}
