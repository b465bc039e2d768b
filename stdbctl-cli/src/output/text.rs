//! Text output formatting with colors.

use chrono::{DateTime, Local, Utc};
use stdbctl_core::{
    CliResult, DatabaseAddresses, GenerateOutcome, IdentityListing, LogLevel, ModuleDescription,
    ModuleLogs, PingOutcome, PublishOutcome, ServerListing, VersionInfo,
};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

const CHECK: &str = "✓";
const CROSS: &str = "✗";
const DEFAULT_MARK: &str = "*";

/// Longest error excerpt shown inline.
const ERROR_CLIP: usize = 400;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Install
    // ========================================================================

    /// Formats the result of `version`.
    pub fn format_version(&self, info: &VersionInfo) -> String {
        if info.installed {
            let version = info.version.as_deref().unwrap_or("unknown version");
            format!("{} SpacetimeDB CLI {}", self.green(CHECK), self.bold(version))
        } else if info.command_not_found {
            format!("{} SpacetimeDB CLI not installed", self.red(CROSS))
        } else {
            format!(
                "{} SpacetimeDB CLI failed: {}",
                self.red(CROSS),
                info.result.clipped_error(ERROR_CLIP)
            )
        }
    }

    // ========================================================================
    // Servers
    // ========================================================================

    /// Formats a ping outcome, labeled with the server that was pinged.
    pub fn format_ping(&self, label: &str, outcome: &PingOutcome) -> String {
        if outcome.is_online {
            let host = outcome.display_host().unwrap_or_else(|| label.to_string());
            format!(
                "{:<10} {} online {}",
                label,
                self.green(CHECK),
                self.dim(&format!("({host}, {} ms)", outcome.elapsed.as_millis()))
            )
        } else {
            let reason = outcome.offline_reason.map_or("offline", |r| r.label());
            format!("{:<10} {} offline {}", label, self.red(CROSS), self.dim(&format!("({reason})")))
        }
    }

    /// Formats a server listing.
    pub fn format_servers(&self, listing: &ServerListing) -> String {
        if listing.result.has_error() {
            return self.format_failure("server list", &listing.result);
        }
        if listing.is_empty() {
            return self.dim("No servers configured");
        }

        let mut lines = vec![self.bold(&format!(
            "  {:<12} {:<34} {}",
            "NICKNAME", "HOST", "PROTOCOL"
        ))];
        for server in &listing.records {
            let row = format!(
                "{} {:<12} {:<34} {}",
                self.default_mark(server.is_default),
                server.nickname,
                server.host,
                server.protocol.as_deref().unwrap_or("-")
            );
            lines.push(row);
        }
        if listing.found_but_no_default() {
            lines.push(self.yellow("No default server set"));
        }
        lines.join("\n")
    }

    /// Formats an identity listing.
    pub fn format_identities(&self, listing: &IdentityListing) -> String {
        if listing.result.has_error() {
            return self.format_failure("identity list", &listing.result);
        }
        if listing.is_empty() {
            return self.dim("No identities");
        }

        let mut lines = vec![self.bold(&format!(
            "  {:<16} {:<34} {}",
            "NAME", "IDENTITY", "EMAIL"
        ))];
        for identity in &listing.records {
            lines.push(format!(
                "{} {:<16} {:<34} {}",
                self.default_mark(identity.is_default),
                identity.nickname,
                identity.identity.as_deref().unwrap_or("-"),
                identity.email.as_deref().unwrap_or("-")
            ));
        }
        if listing.found_but_no_default() {
            lines.push(self.yellow("No default identity set"));
        }
        lines.join("\n")
    }

    /// Formats database addresses.
    pub fn format_addresses(&self, addresses: &DatabaseAddresses) -> String {
        if addresses.result.has_error() {
            return self.format_failure("list", &addresses.result);
        }
        if !addresses.has_addresses() {
            return self.dim(&format!("No databases for {}", addresses.identity));
        }
        let mut lines = vec![format!("Databases for {}:", self.bold(&addresses.identity))];
        lines.extend(addresses.addresses.iter().map(|a| format!("  {}", self.cyan(a))));
        lines.join("\n")
    }

    // ========================================================================
    // Modules
    // ========================================================================

    /// Formats a module's reducers.
    pub fn format_description(&self, description: &ModuleDescription) -> String {
        if description.result.has_error() {
            return self.format_failure("describe", &description.result);
        }
        let structure = &description.structure;
        if !structure.has_reducers() {
            return self.dim(&format!("{} has no reducers", description.module_name));
        }

        let mut lines = vec![format!(
            "{} ({} reducers)",
            self.bold(&description.module_name),
            structure.reducers.len()
        )];
        for reducer in &structure.reducers {
            let hints = reducer.syntax_hints().join(", ");
            lines.push(format!("  {}({})", self.cyan(&reducer.name), hints));
        }
        lines.join("\n")
    }

    /// Formats module logs, colored by level.
    pub fn format_logs(&self, logs: &ModuleLogs) -> String {
        if logs.result.has_error() {
            return self.format_failure("logs", &logs.result);
        }
        logs.lines
            .iter()
            .map(|line| match line.level {
                LogLevel::Error => self.red(&line.text),
                LogLevel::Warning => self.yellow(&line.text),
                LogLevel::Info => line.text.clone(),
                LogLevel::Other => self.dim(&line.text),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Formats a publish outcome.
    pub fn format_publish(&self, outcome: &PublishOutcome) -> String {
        if outcome.result.is_canceled() {
            return self.format_failure("publish", &outcome.result);
        }
        if !outcome.is_success {
            let kind = outcome.error_kind.map_or("Publish failed", |k| k.label());
            let detail = outcome.result.clipped_error(ERROR_CLIP);
            return if detail.is_empty() {
                format!("{} {}", self.red(CROSS), kind)
            } else {
                format!("{} {}\n{}", self.red(CROSS), kind, self.dim(&detail))
            };
        }

        let mut lines = vec![format!(
            "{} Published {}",
            self.green(CHECK),
            self.bold(&outcome.request.module_name)
        )];
        if let Some(address) = &outcome.database_address {
            lines.push(format!("Address:  {}", self.cyan(address)));
        }
        if let Some(host) = &outcome.uploaded_host {
            lines.push(format!("Host:     {host}"));
        }
        lines.push(format!("At:       {}", format_local(outcome.published_at)));
        if !outcome.is_optimized {
            lines.push(self.yellow("wasm-opt not found, module was not optimized"));
        }
        lines.join("\n")
    }

    /// Formats a generate outcome.
    pub fn format_generate(&self, outcome: &GenerateOutcome) -> String {
        if outcome.is_success {
            format!(
                "{} Generated client files in {}",
                self.green(CHECK),
                outcome.out_dir.display()
            )
        } else {
            self.format_failure("generate", &outcome.result)
        }
    }

    // ========================================================================
    // Generic Results
    // ========================================================================

    /// Formats a raw result: `success` when it has no error text.
    pub fn format_result(&self, action: &str, result: &CliResult, success: &str) -> String {
        if result.has_error() {
            return self.format_failure(action, result);
        }
        let output = result.output.trim();
        if output.is_empty() {
            format!("{} {}", self.green(CHECK), success)
        } else {
            format!("{} {}\n{}", self.green(CHECK), success, self.dim(output))
        }
    }

    /// Formats a failed or canceled result.
    pub fn format_failure(&self, action: &str, result: &CliResult) -> String {
        if result.is_canceled() {
            return format!("{} {action} canceled", self.yellow(CROSS));
        }
        let mut lines = vec![format!("{} {action} failed", self.red(CROSS))];
        if result.has_errors_found() {
            lines.extend(result.errors_found.iter().map(|e| format!("  {e}")));
        } else {
            lines.push(format!("  {}", result.clipped_error(ERROR_CLIP)));
        }
        lines.join("\n")
    }

    /// Formats an error message.
    pub fn format_error(&self, context: &str, error: &str) -> String {
        format!("{} {}: {}", self.red(CROSS), self.bold(context), error)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn default_mark(&self, is_default: bool) -> String {
        if is_default {
            self.green(DEFAULT_MARK)
        } else {
            " ".to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

fn format_local(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}
