//! Last successful publish.
//!
//! Kept in the cache directory so `generate` can reuse the published
//! module's project path without publishing again.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use stdbctl_core::PublishOutcome;

use crate::error::StoreError;
use crate::persistence::{JsonFile, StorePaths};

/// File-backed cache of the last successful [`PublishOutcome`].
#[derive(Debug, Clone)]
pub struct PublishCache {
    file: JsonFile,
}

impl PublishCache {
    /// Creates a cache at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }

    /// Creates a cache at the default location.
    pub fn at_default_path() -> Self {
        Self::new(StorePaths::resolve().publish_cache_file())
    }

    /// Cache file path.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Stores `outcome` if it succeeded. Returns whether it was stored.
    ///
    /// # Errors
    ///
    /// Returns error if the cache file cannot be written.
    pub async fn record(&self, outcome: &PublishOutcome) -> Result<bool, StoreError> {
        if !outcome.is_success {
            debug!(module = %outcome.request.module_name, "Publish failed, cache unchanged");
            return Ok(false);
        }
        self.file.write(outcome).await?;
        info!(
            module = %outcome.request.module_name,
            path = %self.file.path().display(),
            "Cached publish result"
        );
        Ok(true)
    }

    /// Loads the cached outcome. A missing or unreadable file is `None`.
    pub async fn load(&self) -> Option<PublishOutcome> {
        match self.file.read().await {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(error = %e, "Publish cache unreadable");
                None
            }
        }
    }

    /// Deletes the cache file, if any.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be removed.
    pub async fn clear(&self) -> Result<(), StoreError> {
        if self.file.remove().await? {
            debug!(path = %self.file.path().display(), "Publish cache cleared");
        }
        Ok(())
    }
}

/// Time since `outcome` was published.
pub fn publish_age(outcome: &PublishOutcome, now: DateTime<Utc>) -> chrono::Duration {
    now.signed_duration_since(outcome.published_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use stdbctl_core::{CliResult, PublishErrorKind, PublishRequest};
    use tempfile::TempDir;

    fn outcome(is_success: bool) -> PublishOutcome {
        PublishOutcome {
            is_success,
            error_kind: (!is_success).then_some(PublishErrorKind::Unclassified),
            uploaded_host: Some("http://127.0.0.1:3000".to_string()),
            database_address: is_success.then(|| "c2006f0b3c8e3a9d".to_string()),
            published_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            is_optimized: true,
            request: PublishRequest::new("chat", "/work/server"),
            result: CliResult::new("Created new database with address: c2006f0b3c8e3a9d", ""),
        }
    }

    #[tokio::test]
    async fn test_record_and_load() {
        let dir = TempDir::new().unwrap();
        let cache = PublishCache::new(dir.path().join("last_publish.json"));
        assert!(cache.load().await.is_none());

        assert!(cache.record(&outcome(true)).await.unwrap());
        assert_eq!(cache.load().await, Some(outcome(true)));
    }

    #[tokio::test]
    async fn test_failed_publish_not_recorded() {
        let dir = TempDir::new().unwrap();
        let cache = PublishCache::new(dir.path().join("last_publish.json"));
        cache.record(&outcome(true)).await.unwrap();

        assert!(!cache.record(&outcome(false)).await.unwrap());
        assert!(cache.load().await.unwrap().is_success);
    }

    #[tokio::test]
    async fn test_clear() {
        let dir = TempDir::new().unwrap();
        let cache = PublishCache::new(dir.path().join("last_publish.json"));
        cache.clear().await.unwrap();

        cache.record(&outcome(true)).await.unwrap();
        cache.clear().await.unwrap();
        assert!(cache.load().await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("last_publish.json");
        tokio::fs::write(&path, "{ nope").await.unwrap();
        assert!(PublishCache::new(path).load().await.is_none());
    }

    #[test]
    fn test_publish_age() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 11, 30, 0).unwrap();
        assert_eq!(publish_age(&outcome(true), now), chrono::Duration::minutes(90));
    }
}
