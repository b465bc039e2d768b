//! `generate` output.

use stdbctl_core::{CliResult, GenerateOutcome, GenerateRequest};

/// Parses `generate` output. Success means no error text; the output
/// directory is the requested one.
pub fn parse_generate(request: &GenerateRequest, result: CliResult) -> GenerateOutcome {
    GenerateOutcome {
        is_success: !result.has_error(),
        out_dir: request.out_dir.clone(),
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_generate() {
        let request = GenerateRequest::new("server", "client/autogen");
        let ok = parse_generate(&request, CliResult::new("Generate finished successfully.", ""));
        assert!(ok.is_success);
        assert_eq!(ok.out_dir, PathBuf::from("client/autogen"));

        let failed = parse_generate(&request, CliResult::new("", "Error: could not find project"));
        assert!(!failed.is_success);
    }
}
