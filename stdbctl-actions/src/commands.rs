//! CLI argument templates.
//!
//! One method per subcommand. User-supplied values are quoted for the
//! platform shell; fixed words are not.

use std::path::Path;

use stdbctl_core::{AddIdentityRequest, AddServerRequest, GenerateRequest, PublishRequest};
use stdbctl_exec::Platform;

/// Builds command lines for the CLI program.
#[derive(Debug, Clone)]
pub struct CliCommands {
    program: String,
    platform: Platform,
}

impl CliCommands {
    /// Creates templates for `program` on `platform`.
    pub fn new(program: impl Into<String>, platform: Platform) -> Self {
        Self {
            program: program.into(),
            platform,
        }
    }

    /// The program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    fn cmd(&self, rest: &str) -> String {
        format!("{} {rest}", self.program)
    }

    fn q(&self, value: &str) -> String {
        self.platform.quote(value)
    }

    fn qp(&self, path: &Path) -> String {
        self.platform.quote(&path.to_string_lossy())
    }

    /// `version`
    pub fn version(&self) -> String {
        self.cmd("version")
    }

    /// `identity list`
    pub fn identity_list(&self) -> String {
        self.cmd("identity list")
    }

    /// `server list`
    pub fn server_list(&self) -> String {
        self.cmd("server list")
    }

    /// `list <identity>`
    pub fn list_databases(&self, identity: &str) -> String {
        self.cmd(&format!("list {}", self.q(identity)))
    }

    /// `describe <module> [--as-identity <id>]`
    pub fn describe(&self, module: &str, as_identity: Option<&str>) -> String {
        let mut line = format!("describe {}", self.q(module));
        if let Some(id) = as_identity.filter(|id| !id.is_empty()) {
            line.push_str(&format!(" --as-identity {}", self.q(id)));
        }
        self.cmd(&line)
    }

    /// `logs <module>`
    pub fn logs(&self, module: &str) -> String {
        self.cmd(&format!("logs {}", self.q(module)))
    }

    /// `server ping [<server>]`
    pub fn server_ping(&self, server: Option<&str>) -> String {
        match server.filter(|s| !s.is_empty()) {
            Some(server) => self.cmd(&format!("server ping {}", self.q(server))),
            None => self.cmd("server ping"),
        }
    }

    /// `start`
    pub fn start(&self) -> String {
        self.cmd("start")
    }

    /// `server fingerprint <server> --force`
    pub fn server_fingerprint(&self, server: &str) -> String {
        self.cmd(&format!("server fingerprint {} --force", self.q(server)))
    }

    /// `identity new --default --name <name> --email <email>`
    pub fn identity_new(&self, request: &AddIdentityRequest) -> String {
        self.cmd(&format!(
            "identity new --default --name {} --email {}",
            self.q(&request.nickname),
            self.q(&request.email)
        ))
    }

    /// `identity set-default <id>`
    pub fn identity_set_default(&self, identity: &str) -> String {
        self.cmd(&format!("identity set-default {}", self.q(identity)))
    }

    /// `server add <url> <name> --default [--no-fingerprint]`
    pub fn server_add(&self, request: &AddServerRequest) -> String {
        let mut line = format!(
            "server add {} {} --default",
            self.q(&request.host),
            self.q(&request.nickname)
        );
        if request.no_fingerprint {
            line.push_str(" --no-fingerprint");
        }
        self.cmd(&line)
    }

    /// `server set-default <name>`
    pub fn server_set_default(&self, server: &str) -> String {
        self.cmd(&format!("server set-default {}", self.q(server)))
    }

    /// `publish --project-path <path> <name> [--clear-database] [--debug]`
    pub fn publish(&self, request: &PublishRequest) -> String {
        let mut line = format!(
            "publish --project-path {} {}",
            self.qp(&request.project_path),
            self.q(&request.module_name)
        );
        if request.clear_data {
            line.push_str(" --clear-database");
        }
        if request.debug {
            line.push_str(" --debug");
        }
        self.cmd(&line)
    }

    /// `generate --lang <lang> --out-dir <dir> --project-path <path> [--delete-files]`
    pub fn generate(&self, request: &GenerateRequest) -> String {
        let mut line = format!(
            "generate --lang {} --out-dir {} --project-path {}",
            self.q(&request.lang),
            self.qp(&request.out_dir),
            self.qp(&request.project_path)
        );
        if request.delete_outdated {
            line.push_str(" --delete-files");
        }
        self.cmd(&line)
    }

    /// `call <module> <reducer> [args...]`
    pub fn call(&self, module: &str, reducer: &str, args: &[String]) -> String {
        let mut line = format!("call {} {}", self.q(module), self.q(reducer));
        for arg in args {
            line.push(' ');
            line.push_str(&self.q(arg));
        }
        self.cmd(&line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unix() -> CliCommands {
        CliCommands::new("spacetime", Platform::Linux)
    }

    #[test]
    fn test_fixed_templates() {
        let c = unix();
        assert_eq!(c.version(), "spacetime version");
        assert_eq!(c.identity_list(), "spacetime identity list");
        assert_eq!(c.server_list(), "spacetime server list");
        assert_eq!(c.start(), "spacetime start");
        assert_eq!(c.server_ping(None), "spacetime server ping");
        assert_eq!(c.server_ping(Some("local")), "spacetime server ping local");
        assert_eq!(
            c.server_fingerprint("local"),
            "spacetime server fingerprint local --force"
        );
    }

    #[test]
    fn test_describe_with_identity() {
        let c = unix();
        assert_eq!(c.describe("chat", None), "spacetime describe chat");
        assert_eq!(c.describe("chat", Some("")), "spacetime describe chat");
        assert_eq!(
            c.describe("chat", Some("c200ab")),
            "spacetime describe chat --as-identity c200ab"
        );
    }

    #[test]
    fn test_publish_flags() {
        let c = unix();
        let request = PublishRequest::new("chat", "/work/my server");
        assert_eq!(
            c.publish(&request),
            "spacetime publish --project-path '/work/my server' chat"
        );
        let request = request.with_clear_data(true).with_debug(true);
        assert_eq!(
            c.publish(&request),
            "spacetime publish --project-path '/work/my server' chat --clear-database --debug"
        );
    }

    #[test]
    fn test_generate() {
        let c = unix();
        let request = GenerateRequest::new("server", "client/autogen");
        assert_eq!(
            c.generate(&request),
            "spacetime generate --lang csharp --out-dir client/autogen --project-path server --delete-files"
        );
    }

    #[test]
    fn test_mutations() {
        let c = unix();
        assert_eq!(
            c.identity_new(&AddIdentityRequest::new("dev", "dev@example.com")),
            "spacetime identity new --default --name dev --email dev@example.com"
        );
        assert_eq!(
            c.server_add(&AddServerRequest::new("local", "http://127.0.0.1:3000").without_fingerprint()),
            "spacetime server add http://127.0.0.1:3000 local --default --no-fingerprint"
        );
        assert_eq!(c.server_set_default("testnet"), "spacetime server set-default testnet");
        assert_eq!(c.identity_set_default("dev"), "spacetime identity set-default dev");
    }

    #[test]
    fn test_call_quotes_args() {
        let c = unix();
        assert_eq!(
            c.call("chat", "send_message", &["hello world".to_string()]),
            "spacetime call chat send_message 'hello world'"
        );
        assert_eq!(c.call("chat", "tick", &[]), "spacetime call chat tick");
    }

    #[test]
    fn test_windows_paths_quoted() {
        let c = CliCommands::new("spacetime", Platform::Windows);
        let request = PublishRequest::new("chat", r"C:\Users\Dev\My Server");
        assert_eq!(
            c.publish(&request),
            r#"spacetime publish --project-path "C:\Users\Dev\My Server" chat"#
        );
    }
}
