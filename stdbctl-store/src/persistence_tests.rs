//! Persistence round-trip and edge case tests.
//!
//! Tests file I/O operations, JSON persistence, and settings round-trip.

use std::path::PathBuf;
use tempfile::TempDir;

use crate::error::StoreError;
use crate::persistence::JsonFile;
use crate::settings_store::{LogLevel, Settings, SettingsStore};

// ============================================================================
// JSON Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_and_load_json_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let file = JsonFile::new(temp_dir.path().join("test.json"));

    let settings = Settings::default();
    file.write(&settings).await.unwrap();
    let loaded: Option<Settings> = file.read().await.unwrap();

    assert_eq!(loaded, Some(settings));
}

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested_path = temp_dir.path().join("deeply").join("nested").join("test.json");

    let data = serde_json::json!({"key": "value"});
    JsonFile::new(nested_path.clone()).write(&data).await.unwrap();
    assert!(nested_path.exists());
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let file = JsonFile::new("/nonexistent/path/settings.json");
    let loaded: Option<Settings> = file.read().await.unwrap();
    assert!(loaded.is_none());
}

#[tokio::test]
async fn test_load_garbage_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(&file_path, "{ broken").await.unwrap();

    let result = JsonFile::new(file_path).read::<Settings>().await;
    assert!(matches!(result, Err(StoreError::Serialization(_))));
}

#[tokio::test]
async fn test_load_or_default_on_garbage() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(&file_path, "not json at all").await.unwrap();

    let loaded: Settings = JsonFile::new(file_path).read_or_default().await;
    assert_eq!(loaded, Settings::default());
}

#[tokio::test]
async fn test_write_into_existing_dir() {
    let temp_dir = TempDir::new().unwrap();
    let file = JsonFile::new(temp_dir.path().join("cache").join("last_publish.json"));

    file.write(&1u32).await.unwrap();
    file.write(&2u32).await.unwrap();
    assert_eq!(file.read::<u32>().await.unwrap(), Some(2));
}

#[tokio::test]
async fn test_atomic_write_leaves_no_temp_file() {
    let temp_dir = TempDir::new().unwrap();
    let file = JsonFile::new(temp_dir.path().join("settings.json"));

    file.write(&Settings::default()).await.unwrap();
    file.write(&Settings::default()).await.unwrap();

    let names: Vec<String> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["settings.json".to_string()]);
}

// ============================================================================
// Settings Files
// ============================================================================

#[tokio::test]
async fn test_load_minimal_json_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(&file_path, r#"{"port": 4000}"#).await.unwrap();

    let loaded: Settings = JsonFile::new(file_path).read().await.unwrap().unwrap();
    assert_eq!(loaded.port, 4000);
    assert_eq!(loaded.program, "spacetime");
    assert_eq!(loaded.log_level, LogLevel::Warn);
}

#[tokio::test]
async fn test_load_json_with_unknown_fields() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(
        &file_path,
        r#"{"program": "/opt/spacetime", "refresh_cadence": "two_minutes"}"#,
    )
    .await
    .unwrap();

    let loaded: Settings = JsonFile::new(file_path).read().await.unwrap().unwrap();
    assert_eq!(loaded.program, "/opt/spacetime");
}

#[tokio::test]
async fn test_store_save_and_reload() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    let store = SettingsStore::load(file_path.clone()).await;
    store.set("testnet_server_url", "https://maincloud.spacetimedb.com").await.unwrap();
    store.set("log_level", "debug").await.unwrap();
    store.save().await.unwrap();

    let reloaded = SettingsStore::load(file_path).await.get().await;
    assert_eq!(reloaded.testnet_server_url, "https://maincloud.spacetimedb.com");
    assert_eq!(reloaded.log_level, LogLevel::Debug);
}

#[tokio::test]
async fn test_remember_module() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    let store = SettingsStore::load(file_path.clone()).await;
    assert!(store.last_module_name().await.is_none());
    store
        .remember_module("quickstart-chat", PathBuf::from("/work/server"))
        .await
        .unwrap();

    let reloaded = SettingsStore::load(file_path).await;
    assert_eq!(
        reloaded.last_module_name().await.as_deref(),
        Some("quickstart-chat")
    );
    assert_eq!(
        reloaded.get().await.last_project_path,
        Some(PathBuf::from("/work/server"))
    );
}

#[tokio::test]
async fn test_unicode_module_name() {
    let temp_dir = TempDir::new().unwrap();
    let file = JsonFile::new(temp_dir.path().join("settings.json"));

    let mut settings = Settings::default();
    settings.last_module_name = Some("чат-模块".to_string());
    file.write(&settings).await.unwrap();

    let loaded: Settings = file.read().await.unwrap().unwrap();
    assert_eq!(loaded.last_module_name.as_deref(), Some("чат-模块"));
}
