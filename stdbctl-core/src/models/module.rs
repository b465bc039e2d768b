//! Published module types.
//!
//! - [`EntityStructure`] - Reducers exposed by a module (`describe`)
//! - [`ReducerInfo`] / [`ReducerParam`] - One reducer and its arguments
//! - [`ModuleLogs`] / [`LogLine`] - Module logs (`logs`)

use serde::{Deserialize, Serialize};
use std::fmt;

use super::cli::CliResult;

// ============================================================================
// Entity Structure
// ============================================================================

/// A reducer argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReducerParam {
    /// Argument name, when the module declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Short type name (e.g. `String`, `U32`, `Product`).
    pub type_hint: String,
}

impl fmt::Display for ReducerParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}: {}", self.type_hint),
            None => write!(f, "{}", self.type_hint),
        }
    }
}

/// A remote-callable reducer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReducerInfo {
    /// Reducer name.
    pub name: String,
    /// Declared argument count.
    pub arity: usize,
    /// Arguments, when the schema lists them.
    #[serde(default)]
    pub params: Vec<ReducerParam>,
}

impl ReducerInfo {
    /// Returns true if the reducer takes arguments.
    pub fn requires_args(&self) -> bool {
        self.arity > 0
    }

    /// One `name: Type` hint per argument.
    pub fn syntax_hints(&self) -> Vec<String> {
        self.params.iter().map(ToString::to_string).collect()
    }

    /// Whether `input` is enough to call the reducer: anything for
    /// zero-arity reducers, otherwise some non-blank text.
    pub fn accepts_input(&self, input: &str) -> bool {
        !self.requires_args() || !input.trim().is_empty()
    }
}

/// Reducers exposed by a published module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStructure {
    /// Reducers, sorted by name.
    pub reducers: Vec<ReducerInfo>,
}

impl EntityStructure {
    /// Returns true if any reducer was found.
    pub fn has_reducers(&self) -> bool {
        !self.reducers.is_empty()
    }

    /// Looks up a reducer by name.
    pub fn reducer(&self, name: &str) -> Option<&ReducerInfo> {
        self.reducers.iter().find(|r| r.name == name)
    }
}

/// Result of describing a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescription {
    /// Module that was described.
    pub module_name: String,
    /// Parsed structure (empty on failure).
    pub structure: EntityStructure,
    /// The raw result.
    pub result: CliResult,
}

// ============================================================================
// Logs
// ============================================================================

/// Log level of a module log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// `INFO:` lines.
    Info,
    /// `WARNING:` lines.
    Warning,
    /// `ERROR:` lines.
    Error,
    /// Untagged lines.
    Other,
}

/// One line of module logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    /// Level tag found on the line.
    pub level: LogLevel,
    /// Full line text.
    pub text: String,
}

/// Logs for a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleLogs {
    /// Module the logs belong to.
    pub module_name: String,
    /// Parsed lines, in order.
    pub lines: Vec<LogLine>,
    /// The raw result.
    pub result: CliResult,
}

impl ModuleLogs {
    /// Counts lines at the given level.
    pub fn count(&self, level: LogLevel) -> usize {
        self.lines.iter().filter(|l| l.level == level).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reducer(arity: usize) -> ReducerInfo {
        ReducerInfo {
            name: "send_message".to_string(),
            arity,
            params: vec![ReducerParam {
                name: Some("text".to_string()),
                type_hint: "String".to_string(),
            }],
        }
    }

    #[test]
    fn test_zero_arity_accepts_empty_input() {
        let r = reducer(0);
        assert!(!r.requires_args());
        assert!(r.accepts_input(""));
    }

    #[test]
    fn test_arity_requires_input() {
        let r = reducer(1);
        assert!(r.requires_args());
        assert!(!r.accepts_input("   "));
        assert!(r.accepts_input("\"hello\""));
        assert_eq!(r.syntax_hints(), vec!["text: String".to_string()]);
    }
}
