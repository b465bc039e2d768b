//! User preferences store.
//!
//! Settings are one JSON document. Missing fields take their defaults, so
//! files written by older versions keep loading.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

use stdbctl_actions::{
    ActionSettings, ServerTarget, DEFAULT_PORT, DEFAULT_PROGRAM, DEFAULT_START_WAIT,
    LOCAL_SERVER_NAME, LOCAL_SERVER_URL, TESTNET_SERVER_NAME, TESTNET_SERVER_URL,
};
use stdbctl_core::GenerateRequest;
use stdbctl_exec::{PollSchedule, RunnerSettings};

use crate::error::StoreError;
use crate::persistence::{JsonFile, StorePaths};

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// CLI program name or path.
    pub program: String,

    /// Directory the CLI was installed into, appended to child search paths.
    pub installed_dir: Option<PathBuf>,

    /// Nickname of the local server.
    pub local_server_name: String,

    /// URL of the local server.
    pub local_server_url: String,

    /// Nickname of the hosted test network.
    pub testnet_server_name: String,

    /// URL of the hosted test network.
    pub testnet_server_url: String,

    /// Port the local server listens on.
    pub port: u16,

    /// Overall ping deadline in milliseconds.
    pub ping_timeout_ms: u64,

    /// Time between pings in milliseconds.
    pub ping_interval_ms: u64,

    /// How long a started local server gets to come online, in milliseconds.
    pub start_wait_ms: u64,

    /// Grace period between terminate and kill on cancel, in milliseconds.
    pub cancel_grace_ms: u64,

    /// Client language for `generate`.
    pub generate_lang: String,

    /// Output directory for `generate`.
    pub generate_out_dir: Option<PathBuf>,

    /// Module name of the last publish.
    pub last_module_name: Option<String>,

    /// Project path of the last publish.
    pub last_project_path: Option<PathBuf>,

    /// Log level.
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        let runner = RunnerSettings::default();
        let ping = PollSchedule::default();
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            installed_dir: None,
            local_server_name: LOCAL_SERVER_NAME.to_string(),
            local_server_url: LOCAL_SERVER_URL.to_string(),
            testnet_server_name: TESTNET_SERVER_NAME.to_string(),
            testnet_server_url: TESTNET_SERVER_URL.to_string(),
            port: DEFAULT_PORT,
            ping_timeout_ms: millis(ping.deadline),
            ping_interval_ms: millis(ping.interval),
            start_wait_ms: millis(DEFAULT_START_WAIT),
            cancel_grace_ms: millis(runner.cancel_grace),
            generate_lang: GenerateRequest::DEFAULT_LANG.to_string(),
            generate_out_dir: None,
            last_module_name: None,
            last_project_path: None,
            log_level: LogLevel::default(),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl Settings {
    /// Keys accepted by [`Settings::set`].
    pub const KEYS: &'static [&'static str] = &[
        "program",
        "installed_dir",
        "local_server_name",
        "local_server_url",
        "testnet_server_name",
        "testnet_server_url",
        "port",
        "ping_timeout_ms",
        "ping_interval_ms",
        "start_wait_ms",
        "cancel_grace_ms",
        "generate_lang",
        "generate_out_dir",
        "last_module_name",
        "last_project_path",
        "log_level",
    ];

    /// Settings for the action façade.
    pub fn action_settings(&self) -> ActionSettings {
        ActionSettings {
            program: self.program.clone(),
            local: ServerTarget::new(&self.local_server_name, &self.local_server_url),
            testnet: ServerTarget::new(&self.testnet_server_name, &self.testnet_server_url),
            port: self.port,
            ping: PollSchedule::new(
                Duration::from_millis(self.ping_interval_ms),
                Duration::from_millis(self.ping_timeout_ms),
            ),
            start_wait: Duration::from_millis(self.start_wait_ms),
        }
    }

    /// Settings for the process runner.
    pub fn runner_settings(&self) -> RunnerSettings {
        RunnerSettings::default().with_cancel_grace(Duration::from_millis(self.cancel_grace_ms))
    }

    /// Sets one field from its text form.
    ///
    /// Optional fields are cleared by an empty value.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys or values that do not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let invalid = || StoreError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        let text = || -> Result<String, StoreError> {
            let value = value.trim();
            if value.is_empty() {
                return Err(invalid());
            }
            Ok(value.to_string())
        };
        let number = || value.trim().parse::<u64>().map_err(|_| invalid());
        let optional = || Some(value.trim()).filter(|v| !v.is_empty()).map(str::to_string);

        match key {
            "program" => self.program = text()?,
            "installed_dir" => self.installed_dir = optional().map(PathBuf::from),
            "local_server_name" => self.local_server_name = text()?,
            "local_server_url" => self.local_server_url = text()?,
            "testnet_server_name" => self.testnet_server_name = text()?,
            "testnet_server_url" => self.testnet_server_url = text()?,
            "port" => self.port = value.trim().parse().map_err(|_| invalid())?,
            "ping_timeout_ms" => self.ping_timeout_ms = number()?,
            "ping_interval_ms" => self.ping_interval_ms = number()?,
            "start_wait_ms" => self.start_wait_ms = number()?,
            "cancel_grace_ms" => self.cancel_grace_ms = number()?,
            "generate_lang" => self.generate_lang = text()?,
            "generate_out_dir" => self.generate_out_dir = optional().map(PathBuf::from),
            "last_module_name" => self.last_module_name = optional(),
            "last_project_path" => self.last_project_path = optional().map(PathBuf::from),
            "log_level" => self.log_level = LogLevel::parse(value).ok_or_else(invalid)?,
            _ => return Err(StoreError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl LogLevel {
    /// Parses a level name, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store with default settings.
    pub fn new(path: PathBuf) -> Self {
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            path,
        }
    }

    /// Loads settings from the default path.
    pub async fn load_default() -> Self {
        Self::load(StorePaths::resolve().settings_file()).await
    }

    /// Loads settings from a path.
    ///
    /// A missing or unreadable file yields defaults.
    pub async fn load(path: PathBuf) -> Self {
        info!(path = %path.display(), "Loading settings");
        let settings = JsonFile::new(path.clone()).read_or_default().await;

        Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
        }
    }

    /// Path the store saves to.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings in memory.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.write().await;
        f(&mut settings);
    }

    /// Sets one field from its text form. See [`Settings::set`].
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys or values that do not parse.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.settings.write().await.set(key, value)
    }

    /// Restores defaults in memory.
    pub async fn reset(&self) {
        *self.settings.write().await = Settings::default();
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        JsonFile::new(self.path.clone()).write(&*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    // ========================================================================
    // Module Memory
    // ========================================================================

    /// Module name of the last publish.
    pub async fn last_module_name(&self) -> Option<String> {
        self.settings.read().await.last_module_name.clone()
    }

    /// Remembers the module and project of a publish, then saves.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn remember_module(
        &self,
        module_name: &str,
        project_path: PathBuf,
    ) -> Result<(), StoreError> {
        self.update(|s| {
            s.last_module_name = Some(module_name.to_string());
            s.last_project_path = Some(project_path);
        })
        .await;
        self.save().await
    }
}
