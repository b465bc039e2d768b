//! Host platform selection.
//!
//! Everything that differs between operating systems lives here: which
//! shell runs CLI commands, how the CLI is installed, how a port is freed
//! and which environment variable holds the search path. The platform is
//! chosen once when a runner is created.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ExecError;

/// Installs the CLI on Windows.
pub const WINDOWS_INSTALL_COMMAND: &str =
    r#"powershell -Command "iwr https://windows.spacetimedb.com -UseBasicParsing | iex""#;

/// Installs the CLI on macOS.
pub const MACOS_INSTALL_COMMAND: &str = "brew install clockworklabs/tap/spacetime";

// ============================================================================
// Platform
// ============================================================================

/// Operating system family the CLI runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Windows (`cmd.exe`).
    Windows,
    /// macOS (`bash`).
    MacOs,
    /// Linux (`bash`).
    Linux,
}

impl Platform {
    /// Detects the platform this binary was built for.
    pub fn current() -> Result<Self, ExecError> {
        if cfg!(target_os = "windows") {
            Ok(Self::Windows)
        } else if cfg!(target_os = "macos") {
            Ok(Self::MacOs)
        } else if cfg!(target_os = "linux") {
            Ok(Self::Linux)
        } else {
            Err(ExecError::UnsupportedPlatform(
                std::env::consts::OS.to_string(),
            ))
        }
    }

    /// Shell executable that interprets commands.
    pub fn shell(&self) -> &'static str {
        match self {
            Self::Windows => "cmd.exe",
            Self::MacOs | Self::Linux => "/bin/bash",
        }
    }

    /// Flag that makes the shell run a single command string.
    pub fn command_flag(&self) -> &'static str {
        match self {
            Self::Windows => "/c",
            Self::MacOs | Self::Linux => "-c",
        }
    }

    /// Environment variable holding the executable search path.
    pub fn path_env_key(&self) -> &'static str {
        match self {
            Self::Windows => "Path",
            Self::MacOs | Self::Linux => "PATH",
        }
    }

    /// Shell command that installs the CLI.
    ///
    /// There is no supported installer on Linux.
    pub fn install_command(&self) -> Result<&'static str, ExecError> {
        match self {
            Self::Windows => Ok(WINDOWS_INSTALL_COMMAND),
            Self::MacOs => Ok(MACOS_INSTALL_COMMAND),
            Self::Linux => Err(ExecError::UnsupportedPlatform(
                "installing the CLI is not supported on Linux".to_string(),
            )),
        }
    }

    /// Shell command that kills whatever process listens on `port`.
    ///
    /// PID 0 is filtered out on every platform.
    pub fn kill_by_port_command(&self, port: u16) -> String {
        match self {
            Self::Windows => format!(
                "netstat -aon | findstr :{port} && for /f \"tokens=5\" %a in ('netstat -aon ^| findstr :{port}') do if not %a==0 taskkill /F /PID %a"
            ),
            Self::MacOs | Self::Linux => {
                format!("lsof -ti:{port} | grep -v '^0$' | xargs -r kill -9")
            }
        }
    }

    /// Quotes a single argument so the shell passes it through unchanged.
    pub fn quote(&self, arg: &str) -> String {
        match self {
            Self::Windows => {
                if !arg.is_empty() && !arg.contains([' ', '\t', '"', '&', '|', '<', '>', '^']) {
                    return arg.to_string();
                }
                format!("\"{}\"", arg.replace('"', "\\\""))
            }
            Self::MacOs | Self::Linux => {
                let safe = |c: char| c.is_ascii_alphanumeric() || "_-./:@%+=,".contains(c);
                if !arg.is_empty() && arg.chars().all(safe) {
                    return arg.to_string();
                }
                format!("'{}'", arg.replace('\'', r"'\''"))
            }
        }
    }

    /// Returns a human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::MacOs => "macOS",
            Self::Linux => "Linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_platform_is_supported() {
        let platform = Platform::current().unwrap();
        if cfg!(windows) {
            assert_eq!(platform, Platform::Windows);
        } else {
            assert_eq!(platform.shell(), "/bin/bash");
        }
    }

    #[test]
    fn test_shell_and_flag() {
        assert_eq!(Platform::Windows.shell(), "cmd.exe");
        assert_eq!(Platform::Windows.command_flag(), "/c");
        assert_eq!(Platform::MacOs.command_flag(), "-c");
        assert_eq!(Platform::Windows.path_env_key(), "Path");
        assert_eq!(Platform::Linux.path_env_key(), "PATH");
    }

    #[test]
    fn test_install_command() {
        assert!(Platform::MacOs.install_command().unwrap().starts_with("brew install"));
        assert!(Platform::Windows.install_command().unwrap().contains("iwr"));
        let err = Platform::Linux.install_command().unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_kill_by_port_filters_pid_zero() {
        let unix = Platform::Linux.kill_by_port_command(3000);
        assert_eq!(unix, "lsof -ti:3000 | grep -v '^0$' | xargs -r kill -9");

        let windows = Platform::Windows.kill_by_port_command(3000);
        assert!(windows.contains("findstr :3000"));
        assert!(windows.contains("if not %a==0 taskkill /F /PID %a"));
    }

    #[test]
    fn test_quote() {
        assert_eq!(Platform::Linux.quote("chat-module"), "chat-module");
        assert_eq!(Platform::Linux.quote("a b"), "'a b'");
        assert_eq!(Platform::Linux.quote("it's"), r"'it'\''s'");
        assert_eq!(Platform::Linux.quote(""), "''");
        assert_eq!(Platform::Windows.quote(r"C:\My Project"), r#""C:\My Project""#);
        assert_eq!(Platform::Windows.quote("plain"), "plain");
    }
}
