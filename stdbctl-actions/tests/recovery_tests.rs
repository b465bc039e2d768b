//! Recovery loop tests against a scripted executor.

mod common;

use std::sync::Arc;

use common::*;
use stdbctl_actions::{RecoveryContext, SpacetimeCli};
use stdbctl_core::CliResult;
use stdbctl_exec::CliInvocation;

const IDENTITY_LIST: &str = "spacetime identity list";
const PING_LOCAL: &str = "spacetime server ping local";
const FINGERPRINT_LOCAL: &str = "spacetime server fingerprint local --force";

fn cli(executor: &Arc<ScriptedExecutor>) -> SpacetimeCli {
    SpacetimeCli::new(executor.clone())
}

#[tokio::test]
async fn test_fingerprint_recovery_end_to_end() {
    let executor = Arc::new(ScriptedExecutor::new());
    executor
        .fail(IDENTITY_LIST, FINGERPRINT_ERR)
        .ok(IDENTITY_LIST, IDENTITIES)
        .fail(PING_LOCAL, REFUSED_ERR)
        .ok(PING_LOCAL, ONLINE)
        .ok(FINGERPRINT_LOCAL, "");

    let listing = cli(&executor).list_identities().await.unwrap();

    assert!(!listing.result.has_error());
    assert_eq!(listing.len(), 1);
    assert_eq!(listing.records[0].nickname, "dev");
    assert_eq!(
        executor.calls(),
        vec![
            IDENTITY_LIST.to_string(),
            PING_LOCAL.to_string(),
            PING_LOCAL.to_string(),
            FINGERPRINT_LOCAL.to_string(),
            IDENTITY_LIST.to_string(),
        ]
    );
    assert_eq!(executor.detached(), vec!["spacetime start".to_string()]);
}

#[tokio::test]
async fn test_online_server_is_not_started() {
    let executor = Arc::new(ScriptedExecutor::new());
    executor
        .fail(IDENTITY_LIST, FINGERPRINT_ERR)
        .ok(IDENTITY_LIST, IDENTITIES)
        .ok(PING_LOCAL, ONLINE)
        .ok(FINGERPRINT_LOCAL, "");

    let listing = cli(&executor).list_identities().await.unwrap();

    assert!(listing.has_records());
    assert!(executor.detached().is_empty());
    assert_eq!(executor.count(PING_LOCAL), 1);
}

#[tokio::test]
async fn test_retries_at_most_once() {
    let executor = Arc::new(ScriptedExecutor::new());
    executor
        .fail(IDENTITY_LIST, FINGERPRINT_ERR)
        .ok(PING_LOCAL, ONLINE)
        .ok(FINGERPRINT_LOCAL, "");

    let listing = cli(&executor).list_identities().await.unwrap();

    assert!(listing.is_empty());
    assert!(listing.result.error.contains("without a saved fingerprint"));
    assert_eq!(executor.count(IDENTITY_LIST), 2);
    assert_eq!(executor.count(FINGERPRINT_LOCAL), 1);
}

#[tokio::test]
async fn test_unresolved_returns_original_result() {
    let executor = Arc::new(ScriptedExecutor::new());
    executor
        .fail(IDENTITY_LIST, FINGERPRINT_ERR)
        .ok(PING_LOCAL, ONLINE)
        .fail(FINGERPRINT_LOCAL, "Error: could not fetch fingerprint");

    let listing = cli(&executor).list_identities().await.unwrap();

    assert_eq!(listing.result.error, FINGERPRINT_ERR);
    assert_eq!(executor.count(IDENTITY_LIST), 1);
}

#[tokio::test]
async fn test_each_top_level_call_may_recover() {
    let executor = Arc::new(ScriptedExecutor::new());
    executor
        .fail(IDENTITY_LIST, FINGERPRINT_ERR)
        .ok(IDENTITY_LIST, IDENTITIES)
        .fail(IDENTITY_LIST, FINGERPRINT_ERR)
        .ok(IDENTITY_LIST, IDENTITIES)
        .ok(PING_LOCAL, ONLINE)
        .ok(FINGERPRINT_LOCAL, "");
    let cli = cli(&executor);

    assert!(cli.list_identities().await.unwrap().has_records());
    assert!(cli.list_identities().await.unwrap().has_records());
    assert_eq!(executor.count(FINGERPRINT_LOCAL), 2);
    assert_eq!(executor.count(IDENTITY_LIST), 4);
}

#[tokio::test]
async fn test_canceled_is_never_recovered() {
    let executor = Arc::new(ScriptedExecutor::new());
    executor.on(IDENTITY_LIST, CliResult::canceled(""));

    let listing = cli(&executor).list_identities().await.unwrap();

    assert!(listing.result.is_canceled());
    assert_eq!(executor.calls(), vec![IDENTITY_LIST.to_string()]);
}

#[tokio::test]
async fn test_unknown_error_is_not_recovered() {
    let executor = Arc::new(ScriptedExecutor::new());
    executor.fail("spacetime server list", "Error: config file is corrupt");

    let listing = cli(&executor).list_servers().await.unwrap();

    assert!(listing.result.has_error());
    assert_eq!(executor.calls().len(), 1);
}

#[tokio::test]
async fn test_offline_signature_recovers() {
    let executor = Arc::new(ScriptedExecutor::new());
    executor
        .fail("spacetime logs chat", REFUSED_ERR)
        .ok("spacetime logs chat", "2024-03-01T10:00:00Z  INFO: hello\n")
        .ok(PING_LOCAL, ONLINE)
        .ok(FINGERPRINT_LOCAL, "");

    let logs = cli(&executor).get_logs("chat").await.unwrap();

    assert_eq!(logs.lines.len(), 1);
    assert_eq!(executor.count("spacetime logs chat"), 2);
}

#[tokio::test]
async fn test_disabled_context_skips_recovery() {
    let executor = Arc::new(ScriptedExecutor::new());
    executor.fail(IDENTITY_LIST, FINGERPRINT_ERR);

    let mut ctx = RecoveryContext::disabled();
    let result = cli(&executor)
        .run_recovering(&CliInvocation::new(IDENTITY_LIST), &mut ctx)
        .await
        .unwrap();

    assert_eq!(result.error, FINGERPRINT_ERR);
    assert_eq!(executor.calls().len(), 1);
    assert_eq!(ctx.retries(), 0);
}
