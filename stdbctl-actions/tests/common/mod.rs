//! Scripted command executor for façade tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use stdbctl_core::CliResult;
use stdbctl_exec::{CliInvocation, CommandExecutor, ExecError, Platform};

pub const FINGERPRINT_ERR: &str =
    "Error: Cannot list identities for server without a saved fingerprint: local";
pub const REFUSED_ERR: &str = "Error: error sending request: tcp connect error: No connection could be made because the target machine actively refused it. (os error 10061)";
pub const ONLINE: &str = "Server is online: http://127.0.0.1:3000\n";
pub const IDENTITIES: &str = " DEFAULT  IDENTITY                          NAME   EMAIL\n \
                              ***      93dda09db9a56d8fa6c024d843e805d8  dev    dev@example.com\n";
pub const SERVERS_NO_DEFAULT: &str = " DEFAULT  HOSTNAME                 PROTOCOL  NICKNAME\n \
                                      \x20        127.0.0.1:3000           http      local\n \
                                      \x20        testnet.spacetimedb.com  https     testnet\n";

/// Replays canned results per command line.
///
/// Each command has a queue; the last entry repeats forever. Unscripted
/// commands fail with an `unscripted` error.
pub struct ScriptedExecutor {
    platform: Platform,
    responses: Mutex<HashMap<String, VecDeque<CliResult>>>,
    calls: Mutex<Vec<String>>,
    invocations: Mutex<Vec<CliInvocation>>,
    detached: Mutex<Vec<String>>,
    installed_dir: Mutex<Option<PathBuf>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::with_platform(Platform::Linux)
    }

    pub fn with_platform(platform: Platform) -> Self {
        Self {
            platform,
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            invocations: Mutex::new(Vec::new()),
            detached: Mutex::new(Vec::new()),
            installed_dir: Mutex::new(None),
        }
    }

    pub fn on(&self, command: &str, result: CliResult) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .entry(command.to_string())
            .or_default()
            .push_back(result);
        self
    }

    pub fn ok(&self, command: &str, output: &str) -> &Self {
        self.on(command, CliResult::new(output, ""))
    }

    pub fn fail(&self, command: &str, error: &str) -> &Self {
        self.on(command, CliResult::new("", error))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Every invocation as received, token and timeout included.
    pub fn invocations(&self) -> Vec<CliInvocation> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn count(&self, command: &str) -> usize {
        self.calls().iter().filter(|c| *c == command).count()
    }

    pub fn detached(&self) -> Vec<String> {
        self.detached.lock().unwrap().clone()
    }

    pub fn installed_dir(&self) -> Option<PathBuf> {
        self.installed_dir.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn run(&self, invocation: &CliInvocation) -> Result<CliResult, ExecError> {
        self.calls.lock().unwrap().push(invocation.command.clone());
        self.invocations.lock().unwrap().push(invocation.clone());
        if invocation.is_cancelled() {
            return Ok(CliResult::canceled(""));
        }

        let mut responses = self.responses.lock().unwrap();
        let Some(queue) = responses.get_mut(&invocation.command) else {
            return Ok(CliResult::new("", format!("unscripted: {}", invocation.command)));
        };
        let result = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        Ok(result.unwrap_or_default())
    }

    fn run_detached(&self, command: &str) -> Result<(), ExecError> {
        self.detached.lock().unwrap().push(command.to_string());
        Ok(())
    }

    fn set_installed_dir(&self, dir: Option<PathBuf>) {
        *self.installed_dir.lock().unwrap() = dir;
    }
}
