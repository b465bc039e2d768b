//! `describe` output.
//!
//! The CLI prints the module schema as JSON:
//!
//! ```json
//! {
//!   "entities": {
//!     "send_message": {
//!       "arity": 1,
//!       "schema": {
//!         "elements": [
//!           { "algebraic_type": { "Builtin": { "String": [] } }, "name": { "some": "text" } }
//!         ],
//!         "name": "send_message"
//!       },
//!       "type": "reducer"
//!     },
//!     "Message": { "schema": { "...": "..." }, "type": "table" }
//!   },
//!   "typespace": []
//! }
//! ```
//!
//! Only reducers are kept. Anything that is not this shape yields an empty
//! structure.

use serde_json::Value;
use tracing::debug;

use stdbctl_core::{CliResult, EntityStructure, ModuleDescription, ReducerInfo, ReducerParam};

use super::common::clean;

/// Returns the JSON object embedded in `text`, skipping leading log lines.
fn json_slice(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Short type name of an algebraic type (`String`, `U32`, `Product`, ...).
fn type_hint(value: &Value) -> String {
    match value {
        Value::Object(map) => match map.iter().next() {
            Some((key, inner)) if key == "Builtin" => type_hint(inner),
            Some((key, _)) => key.clone(),
            None => "Unknown".to_string(),
        },
        Value::String(name) => name.clone(),
        _ => "Unknown".to_string(),
    }
}

fn reducer_params(entity: &Value) -> Vec<ReducerParam> {
    entity
        .pointer("/schema/elements")
        .and_then(Value::as_array)
        .map(|elements| {
            elements
                .iter()
                .map(|element| ReducerParam {
                    name: element
                        .pointer("/name/some")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    type_hint: type_hint(element.get("algebraic_type").unwrap_or(&Value::Null)),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parses the reducers out of `describe` JSON.
pub fn parse_entity_structure(text: &str) -> EntityStructure {
    let text = clean(text);
    let Some(json) = json_slice(&text) else {
        return EntityStructure::default();
    };
    let root: Value = match serde_json::from_str(json) {
        Ok(root) => root,
        Err(e) => {
            debug!(error = %e, "describe output is not JSON");
            return EntityStructure::default();
        }
    };
    let Some(entities) = root.get("entities").and_then(Value::as_object) else {
        return EntityStructure::default();
    };

    let mut reducers: Vec<ReducerInfo> = entities
        .iter()
        .filter(|(_, entity)| entity.get("type").and_then(Value::as_str) == Some("reducer"))
        .map(|(name, entity)| {
            let params = reducer_params(entity);
            let arity = entity
                .get("arity")
                .and_then(Value::as_u64)
                .and_then(|a| usize::try_from(a).ok())
                .unwrap_or(params.len());
            ReducerInfo {
                name: name.clone(),
                arity,
                params,
            }
        })
        .collect();
    reducers.sort_by(|a, b| a.name.cmp(&b.name));

    EntityStructure { reducers }
}

/// Parses `describe` output for `module_name`.
pub fn parse_describe(module_name: &str, result: CliResult) -> ModuleDescription {
    let structure = if result.has_error() {
        EntityStructure::default()
    } else {
        parse_entity_structure(&result.output)
    };
    ModuleDescription {
        module_name: module_name.to_string(),
        structure,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIBE: &str = r#"{
        "entities": {
            "send_message": {
                "arity": 1,
                "schema": {
                    "elements": [
                        { "algebraic_type": { "Builtin": { "String": [] } }, "name": { "some": "text" } }
                    ],
                    "name": "send_message"
                },
                "type": "reducer"
            },
            "Message": { "schema": { "elements": [] }, "type": "table" },
            "__init__": { "arity": 0, "schema": { "elements": [] }, "type": "reducer" },
            "move_to": {
                "arity": 2,
                "schema": {
                    "elements": [
                        { "algebraic_type": { "Builtin": { "F32": [] } }, "name": { "some": "x" } },
                        { "algebraic_type": { "Ref": 3 }, "name": { "none": [] } }
                    ]
                },
                "type": "reducer"
            }
        },
        "typespace": []
    }"#;

    #[test]
    fn test_reducers_sorted_tables_skipped() {
        let structure = parse_entity_structure(DESCRIBE);
        let names: Vec<&str> = structure.reducers.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["__init__", "move_to", "send_message"]);
    }

    #[test]
    fn test_params_and_hints() {
        let structure = parse_entity_structure(DESCRIBE);
        let move_to = structure.reducer("move_to").unwrap();
        assert_eq!(move_to.arity, 2);
        assert_eq!(move_to.syntax_hints(), vec!["x: F32".to_string(), "Ref".to_string()]);

        let send = structure.reducer("send_message").unwrap();
        assert_eq!(send.params[0].name.as_deref(), Some("text"));
        assert_eq!(send.params[0].type_hint, "String");
        assert!(!structure.reducer("__init__").unwrap().requires_args());
    }

    #[test]
    fn test_leading_log_lines_skipped() {
        let text = format!("WARNING: something\n{DESCRIBE}\n");
        assert_eq!(parse_entity_structure(&text).reducers.len(), 3);
    }

    #[test]
    fn test_malformed_is_empty() {
        assert!(!parse_entity_structure("{ not json").has_reducers());
        assert!(!parse_entity_structure("[]").has_reducers());
        assert!(!parse_entity_structure(r#"{"entities": 3}"#).has_reducers());
        assert!(!parse_entity_structure("").has_reducers());
    }

    #[test]
    fn test_describe_error() {
        let description = parse_describe("chat", CliResult::new(DESCRIBE, "Error: no such module"));
        assert!(!description.structure.has_reducers());
        assert_eq!(description.module_name, "chat");
    }
}
