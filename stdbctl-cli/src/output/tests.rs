//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::TextFormatter;
    use chrono::Utc;
    use std::path::PathBuf;
    use std::time::Duration;
    use stdbctl_core::{
        CliResult, EntityStructure, GenerateOutcome, Listing, LogLevel, LogLine,
        ModuleDescription, ModuleLogs, OfflineReason, PingOutcome, PublishErrorKind,
        PublishOutcome, PublishRequest, ReducerInfo, ReducerParam, ServerRecord, VersionInfo,
    };

    fn plain() -> TextFormatter {
        TextFormatter::new(false)
    }

    fn publish(is_success: bool, error: &str) -> PublishOutcome {
        PublishOutcome {
            is_success,
            error_kind: (!is_success).then_some(PublishErrorKind::PermissionDenied),
            uploaded_host: Some("http://127.0.0.1:3000".to_string()),
            database_address: Some("c2006f0b3c8e3a9d".to_string()),
            published_at: Utc::now(),
            is_optimized: false,
            request: PublishRequest::new("chat", "/work/server"),
            result: CliResult::new("", error),
        }
    }

    #[test]
    fn test_version_states() {
        let installed = VersionInfo {
            installed: true,
            version: Some("0.8.2".to_string()),
            command_not_found: false,
            result: CliResult::default(),
        };
        assert_eq!(plain().format_version(&installed), "✓ SpacetimeDB CLI 0.8.2");

        let missing = VersionInfo {
            installed: false,
            version: None,
            command_not_found: true,
            result: CliResult::new("", "spacetime: command not found"),
        };
        assert_eq!(plain().format_version(&missing), "✗ SpacetimeDB CLI not installed");
    }

    #[test]
    fn test_ping_offline_reason() {
        let outcome = PingOutcome::offline(
            OfflineReason::ConnectionRefused,
            CliResult::new("", "connection refused"),
        );
        let text = plain().format_ping("local", &outcome);
        assert!(text.starts_with("local"));
        assert!(text.contains("offline (connection refused)"));
    }

    #[test]
    fn test_ping_online_shows_localhost() {
        let mut outcome = PingOutcome::offline(OfflineReason::Other, CliResult::default());
        outcome.is_online = true;
        outcome.offline_reason = None;
        outcome.host_url = Some("http://127.0.0.1:3000".to_string());
        outcome.elapsed = Duration::from_millis(12);

        let text = plain().format_ping("local", &outcome);
        assert!(text.contains("online (http://localhost:3000, 12 ms)"));
    }

    #[test]
    fn test_servers_marks_default() {
        let listing = Listing::new(
            vec![
                ServerRecord::new("local", "127.0.0.1:3000", false),
                ServerRecord::new("testnet", "testnet.spacetimedb.com", true),
            ],
            CliResult::default(),
        );
        let text = plain().format_servers(&listing);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("  local"));
        assert!(lines[2].starts_with("* testnet"));
    }

    #[test]
    fn test_servers_without_default_warns() {
        let listing = Listing::new(
            vec![ServerRecord::new("local", "127.0.0.1:3000", false)],
            CliResult::default(),
        );
        assert!(plain()
            .format_servers(&listing)
            .ends_with("No default server set"));
    }

    #[test]
    fn test_listing_failure_shows_errors_found() {
        let result = CliResult::new("", "Error: boom\nmore")
            .with_errors_found(vec!["Error: boom".to_string()]);
        let listing: Listing<ServerRecord> = Listing::empty(result);
        assert_eq!(
            plain().format_servers(&listing),
            "✗ server list failed\n  Error: boom"
        );
    }

    #[test]
    fn test_canceled_result() {
        assert_eq!(
            plain().format_failure("publish", &CliResult::canceled("")),
            "✗ publish canceled"
        );
    }

    #[test]
    fn test_description_hints() {
        let description = ModuleDescription {
            module_name: "chat".to_string(),
            structure: EntityStructure {
                reducers: vec![ReducerInfo {
                    name: "send_message".to_string(),
                    arity: 1,
                    params: vec![ReducerParam {
                        name: Some("text".to_string()),
                        type_hint: "String".to_string(),
                    }],
                }],
            },
            result: CliResult::default(),
        };
        assert_eq!(
            plain().format_description(&description),
            "chat (1 reducers)\n  send_message(text: String)"
        );
    }

    #[test]
    fn test_logs_colored_by_level() {
        let logs = ModuleLogs {
            module_name: "chat".to_string(),
            lines: vec![
                LogLine {
                    level: LogLevel::Error,
                    text: "ERROR: bad".to_string(),
                },
                LogLine {
                    level: LogLevel::Info,
                    text: "INFO: fine".to_string(),
                },
            ],
            result: CliResult::default(),
        };
        let colored = TextFormatter::new(true).format_logs(&logs);
        assert!(colored.contains("\x1b[31mERROR: bad"));
        assert!(colored.contains("\nINFO: fine"));
    }

    #[test]
    fn test_publish_success_lines() {
        let text = plain().format_publish(&publish(true, ""));
        assert!(text.starts_with("✓ Published chat"));
        assert!(text.contains("Address:  c2006f0b3c8e3a9d"));
        assert!(text.contains("Host:     http://127.0.0.1:3000"));
        assert!(text.ends_with("wasm-opt not found, module was not optimized"));
    }

    #[test]
    fn test_publish_failure_label() {
        let text = plain().format_publish(&publish(false, "Error: DBUpdateRejected"));
        assert_eq!(text, "✗ Permission denied\nError: DBUpdateRejected");
    }

    #[test]
    fn test_publish_canceled() {
        let mut outcome = publish(false, "");
        outcome.error_kind = Some(PublishErrorKind::Unclassified);
        outcome.result = CliResult::canceled("Build started\n");
        assert_eq!(plain().format_publish(&outcome), "✗ publish canceled");
    }

    #[test]
    fn test_generate() {
        let outcome = GenerateOutcome {
            is_success: true,
            out_dir: PathBuf::from("client/autogen"),
            result: CliResult::default(),
        };
        assert_eq!(
            plain().format_generate(&outcome),
            "✓ Generated client files in client/autogen"
        );
    }

    #[test]
    fn test_result_with_output() {
        let result = CliResult::new("Server set as default.\n", "");
        assert_eq!(
            plain().format_result("server set-default", &result, "Default server: local"),
            "✓ Default server: local\nServer set as default."
        );
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::JsonFormatter;
    use stdbctl_core::{CliResult, OfflineReason, PingOutcome};

    #[test]
    fn test_ping_outcome_fields() {
        let outcome = PingOutcome::offline(OfflineReason::Canceled, CliResult::canceled(""));
        let json = JsonFormatter::new(false).format(&outcome).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["is_online"], false);
        assert!(value.get("offline_reason").is_some());
    }
}
