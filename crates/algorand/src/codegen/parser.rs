//! App spec parser
//!
//! Loads ARC-56 documents directly and upgrades ARC-32 documents to the ARC-56
//! model.

use appclient_common::{Error, Result};
use appclient_core::arc56::{
    Actions, Arc56Contract, FieldType, Method, SchemaCounts, StorageKey, StructField,
};
use base64::prelude::*;
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// Dialect of an app spec document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Arc56,
    Arc32,
    Unknown,
}

impl fmt::Display for SpecFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecFormat::Arc56 => write!(f, "arc56"),
            SpecFormat::Arc32 => write!(f, "arc32"),
            SpecFormat::Unknown => write!(f, "unknown"),
        }
    }
}

/// Classify a parsed JSON document by its top-level keys
pub fn detect_format(value: &Value) -> SpecFormat {
    let Some(obj) = value.as_object() else {
        return SpecFormat::Unknown;
    };
    if obj.contains_key("contract") {
        SpecFormat::Arc32
    } else if obj.contains_key("methods") && obj.contains_key("bareActions") {
        SpecFormat::Arc56
    } else {
        SpecFormat::Unknown
    }
}

/// ARC-32 on-completion keys and their ARC-56 action tags
const ARC32_ACTIONS: [(&str, &str); 5] = [
    ("no_op", "NoOp"),
    ("opt_in", "OptIn"),
    ("close_out", "CloseOut"),
    ("update_application", "UpdateApplication"),
    ("delete_application", "DeleteApplication"),
];

/// App spec parser
#[derive(Debug, Default)]
pub struct AppSpecParser;

impl AppSpecParser {
    /// Create a new parser instance
    pub fn new() -> Self {
        Self
    }

    /// Parse an app spec file
    pub fn parse_file(&self, file_path: &str) -> Result<Arc56Contract> {
        let content = std::fs::read_to_string(file_path)
            .map_err(|e| Error::io(format!("Failed to read app spec file {}: {}", file_path, e)))?;
        self.parse_content(&content)
    }

    /// Detect the dialect of an app spec file
    pub fn detect_file(&self, file_path: &str) -> Result<SpecFormat> {
        let content = std::fs::read_to_string(file_path)
            .map_err(|e| Error::io(format!("Failed to read app spec file {}: {}", file_path, e)))?;
        let value: Value = serde_json::from_str(&content)
            .map_err(|e| Error::parse(format!("Invalid JSON: {}", e)))?;
        Ok(detect_format(&value))
    }

    /// Parse an app spec from JSON content
    pub fn parse_content(&self, content: &str) -> Result<Arc56Contract> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| Error::parse(format!("Invalid JSON: {}", e)))?;
        self.parse_value(value)
    }

    /// Parse an app spec from a JSON value
    pub fn parse_value(&self, value: Value) -> Result<Arc56Contract> {
        match detect_format(&value) {
            SpecFormat::Arc56 => {
                debug!("Detected ARC-56 app spec");
                serde_json::from_value(value)
                    .map_err(|e| Error::parse(format!("Invalid ARC-56 document: {}", e)))
            }
            SpecFormat::Arc32 => {
                debug!("Detected ARC-32 app spec, converting to ARC-56");
                self.upcast_arc32(&value)
            }
            SpecFormat::Unknown => Err(Error::parse(
                "Unrecognized app spec format: expected ARC-56 (methods + bareActions) or ARC-32 (contract)",
            )),
        }
    }

    /// Convert an ARC-32 document to the ARC-56 model
    fn upcast_arc32(&self, value: &Value) -> Result<Arc56Contract> {
        let contract = value
            .get("contract")
            .and_then(|v| v.as_object())
            .ok_or_else(|| Error::parse("ARC-32 'contract' must be an object"))?;
        let name = contract
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::parse("ARC-32 contract is missing 'name'"))?;

        let mut spec = Arc56Contract {
            arcs: vec![4, 56],
            name: name.to_string(),
            desc: contract.get("desc").and_then(|v| v.as_str()).map(str::to_string),
            ..Default::default()
        };

        let empty = Map::new();
        let hints = value.get("hints").and_then(|v| v.as_object()).unwrap_or(&empty);

        let methods = contract
            .get("methods")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        for raw in methods {
            let mut method: Method = serde_json::from_value(raw)
                .map_err(|e| Error::parse(format!("Invalid ARC-32 method: {}", e)))?;
            if let Some(hint) = hints.get(&method.signature()) {
                self.apply_hint(&mut spec, &mut method, hint);
            }
            spec.methods.push(method);
        }

        self.upcast_state(&mut spec, value);
        spec.bare_actions = value
            .get("bare_call_config")
            .map(|config| self.call_config_actions(config))
            .unwrap_or_default();

        if let Some(source) = value.get("source") {
            spec.extra.insert("source".to_string(), source.clone());
        }

        Ok(spec)
    }

    fn apply_hint(&self, spec: &mut Arc56Contract, method: &mut Method, hint: &Value) {
        if let Some(config) = hint.get("call_config") {
            method.actions = self.call_config_actions(config);
        }
        method.readonly = hint.get("read_only").and_then(|v| v.as_bool()).unwrap_or(false);

        let Some(structs) = hint.get("structs").and_then(|v| v.as_object()) else {
            return;
        };
        for (target, def) in structs {
            let Some(struct_name) = def.get("name").and_then(|v| v.as_str()) else {
                continue;
            };
            if !spec.structs.contains_key(struct_name) {
                let fields = def
                    .get("elements")
                    .and_then(|v| v.as_array())
                    .map(|elements| elements.iter().filter_map(Self::struct_element).collect())
                    .unwrap_or_default();
                spec.structs.insert(struct_name.to_string(), fields);
            }

            if target == "output" {
                method.returns.struct_name = Some(struct_name.to_string());
            } else if let Some(arg) =
                method.args.iter_mut().find(|a| a.name.as_deref() == Some(target.as_str()))
            {
                arg.struct_name = Some(struct_name.to_string());
            }
        }
    }

    /// `["field", "type"]` pair of an ARC-32 struct hint
    fn struct_element(element: &Value) -> Option<StructField> {
        let pair = element.as_array()?;
        let name = pair.first()?.as_str()?;
        let ty = pair.get(1)?.as_str()?;
        Some(StructField {
            name: name.to_string(),
            field_type: FieldType::Abi(ty.to_string()),
        })
    }

    /// Translate an ARC-32 `call_config` object into create / call lists
    fn call_config_actions(&self, config: &Value) -> Actions {
        let mut actions = Actions::default();
        for (key, tag) in ARC32_ACTIONS {
            let (create, call) = match config.get(key).and_then(|v| v.as_str()) {
                Some("CALL") => (false, true),
                Some("CREATE") => (true, false),
                Some("ALL") => (true, true),
                _ => (false, false),
            };
            if create {
                actions.create.push(tag.to_string());
            }
            if call {
                actions.call.push(tag.to_string());
            }
        }
        actions
    }

    fn upcast_state(&self, spec: &mut Arc56Contract, value: &Value) {
        for scope in ["global", "local"] {
            let counts = value.get("state").and_then(|s| s.get(scope));
            let count = |key: &str| {
                counts.and_then(|c| c.get(key)).and_then(|v| v.as_u64()).unwrap_or(0)
            };
            let schema = SchemaCounts { ints: count("num_uints"), bytes: count("num_byte_slices") };

            let declared = value
                .get("schema")
                .and_then(|s| s.get(scope))
                .and_then(|s| s.get("declared"))
                .and_then(|d| d.as_object());

            let keys = match scope {
                "global" => {
                    spec.state.schema.global = schema;
                    &mut spec.state.keys.global
                }
                _ => {
                    spec.state.schema.local = schema;
                    &mut spec.state.keys.local
                }
            };

            for (name, entry) in declared.into_iter().flatten() {
                let raw_key = entry.get("key").and_then(|v| v.as_str()).unwrap_or(name);
                let value_type = match entry.get("type").and_then(|v| v.as_str()) {
                    Some("uint64") => "AVMUint64",
                    _ => "AVMBytes",
                };
                let desc = entry
                    .get("descr")
                    .and_then(|v| v.as_str())
                    .filter(|d| !d.is_empty())
                    .map(str::to_string);
                keys.insert(
                    name.clone(),
                    StorageKey {
                        key_type: "AVMString".to_string(),
                        value_type: value_type.to_string(),
                        key: BASE64_STANDARD.encode(raw_key),
                        desc,
                    },
                );
            }
        }
    }
}
