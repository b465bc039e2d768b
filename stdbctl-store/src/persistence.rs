//! Where stdbctl keeps its files, and how they are written.
//!
//! Settings live in the user's config directory, the last publish in the
//! cache directory. `STDBCTL_HOME` moves both under a single root. Every
//! file is a JSON document that only its owner can read.

use serde::{de::DeserializeOwned, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::StoreError;

const APP_DIR: &str = "stdbctl";
const SETTINGS_FILE: &str = "settings.json";
const PUBLISH_CACHE_FILE: &str = "last_publish.json";

/// Environment variable that relocates all stdbctl files.
pub const HOME_ENV: &str = "STDBCTL_HOME";

// ============================================================================
// Locations
// ============================================================================

/// The two directories stdbctl writes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorePaths {
    /// Holds `settings.json`.
    pub config_dir: PathBuf,
    /// Holds `last_publish.json`.
    pub cache_dir: PathBuf,
}

impl StorePaths {
    /// Resolves the directories for the current user.
    ///
    /// `STDBCTL_HOME` wins. Otherwise the platform directories are used:
    /// `~/.config` and `~/.cache` on Linux, `~/Library/Application Support`
    /// and `~/Library/Caches` on macOS, `%APPDATA%` and `%LOCALAPPDATA%` on
    /// Windows.
    pub fn resolve() -> Self {
        match std::env::var_os(HOME_ENV).filter(|home| !home.is_empty()) {
            Some(home) => Self::under(home),
            None => Self::from_platform(dirs::config_dir(), dirs::cache_dir()),
        }
    }

    /// Both directories below `root`, as `config/` and `cache/`.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config_dir: root.join("config"),
            cache_dir: root.join("cache"),
        }
    }

    /// Without a config dir everything goes to `./.stdbctl`; without a
    /// cache dir the cache shares the config dir.
    fn from_platform(config: Option<PathBuf>, cache: Option<PathBuf>) -> Self {
        let config_dir =
            config.map_or_else(|| PathBuf::from(format!(".{APP_DIR}")), |dir| dir.join(APP_DIR));
        let cache_dir = cache.map_or_else(|| config_dir.clone(), |dir| dir.join(APP_DIR));
        Self {
            config_dir,
            cache_dir,
        }
    }

    /// Settings document.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    /// Last successful publish.
    pub fn publish_cache_file(&self) -> PathBuf {
        self.cache_dir.join(PUBLISH_CACHE_FILE)
    }
}

// ============================================================================
// Documents
// ============================================================================

/// A JSON document at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    /// Document at `path`. Nothing is touched until it is read or written.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the document. A missing file is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    pub async fn read<T: DeserializeOwned>(&self) -> Result<Option<T>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Reads the document, using `T::default()` when it is missing or broken.
    pub async fn read_or_default<T: DeserializeOwned + Default>(&self) -> T {
        match self.read().await {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!(path = %self.path.display(), "No file yet, using defaults");
                T::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Unusable file, using defaults");
                T::default()
            }
        }
    }

    /// Replaces the document.
    ///
    /// The new content goes to a hidden sibling first and is renamed over
    /// the target, so a reader sees either the old or the new document.
    /// Missing directories are created 0700 and the file is 0600 on Unix.
    ///
    /// # Errors
    ///
    /// Returns error if `value` cannot be serialized or the file cannot be
    /// written.
    pub async fn write<T: Serialize>(&self, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(value)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_private_dir(parent).await?;
        }

        let staging = self.staging_path();
        write_private(&staging, &json).await?;
        if let Err(e) = tokio::fs::rename(&staging, &self.path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&staging).await {
                debug!(path = %staging.display(), error = %cleanup, "Staging file left behind");
            }
            return Err(e.into());
        }

        debug!(path = %self.path.display(), bytes = json.len(), "Document saved");
        Ok(())
    }

    /// Deletes the document. Returns whether there was one.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be removed.
    pub async fn remove(&self) -> Result<bool, StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// `.<name>.<pid>.tmp` next to the target, one per writing process.
    fn staging_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path
            .with_file_name(format!(".{name}.{}.tmp", std::process::id()))
    }
}

async fn create_private_dir(dir: &Path) -> Result<(), StoreError> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o700);
    builder.create(dir).await?;
    Ok(())
}

async fn write_private(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
