//! ARC-56 application specification model
//!
//! Mirrors the JSON layout of an ARC-56 document. Object-valued tables keep
//! their declaration order, and members this model does not interpret are
//! carried in `extra` so a parsed spec serializes back without loss.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha512_256};

/// Struct name to ordered field list
pub type StructTable = IndexMap<String, Vec<StructField>>;

/// Parsed ARC-56 contract description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arc56Contract {
    #[serde(default)]
    pub arcs: Vec<u32>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default)]
    pub structs: StructTable,
    #[serde(default)]
    pub methods: Vec<Method>,
    #[serde(default)]
    pub state: ContractState,
    #[serde(default)]
    pub bare_actions: Actions,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Arc56Contract {
    /// Find a method by its ABI name (first match for overloaded names)
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// One field of a named struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// A struct field is an ABI type / struct name, or an inline nested field list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldType {
    Abi(String),
    Nested(Vec<StructField>),
}

impl FieldType {
    /// ABI type expression for this field; nested fields become a tuple
    pub fn abi_type(&self) -> String {
        match self {
            FieldType::Abi(ty) => ty.clone(),
            FieldType::Nested(fields) => {
                let parts: Vec<String> = fields.iter().map(|f| f.field_type.abi_type()).collect();
                format!("({})", parts.join(","))
            }
        }
    }
}

/// ABI method description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default)]
    pub args: Vec<MethodArg>,
    #[serde(default)]
    pub returns: MethodReturns,
    #[serde(default)]
    pub actions: Actions,
    #[serde(default)]
    pub readonly: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Method {
    /// ARC-4 signature, e.g. `hello(string)string`
    pub fn signature(&self) -> String {
        let args: Vec<&str> = self.args.iter().map(|a| a.arg_type.as_str()).collect();
        format!("{}({}){}", self.name, args.join(","), self.returns.return_type)
    }

    /// ARC-4 selector: first four bytes of SHA-512/256 over the signature
    pub fn selector(&self) -> String {
        let mut hasher = Sha512_256::new();
        hasher.update(self.signature().as_bytes());
        let hash = hasher.finalize();
        format!("0x{}", hex::encode(&hash[..4]))
    }
}

/// Method argument
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodArg {
    #[serde(rename = "type")]
    pub arg_type: String,
    #[serde(rename = "struct", default, skip_serializing_if = "Option::is_none")]
    pub struct_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Method return value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodReturns {
    #[serde(rename = "type")]
    pub return_type: String,
    #[serde(rename = "struct", default, skip_serializing_if = "Option::is_none")]
    pub struct_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

impl Default for MethodReturns {
    fn default() -> Self {
        Self {
            return_type: "void".to_string(),
            struct_name: None,
            desc: None,
        }
    }
}

/// On-completion actions allowed when creating and when calling
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actions {
    #[serde(default)]
    pub create: Vec<String>,
    #[serde(default)]
    pub call: Vec<String>,
}

/// Declared state of the contract
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractState {
    #[serde(default)]
    pub schema: StateSchema,
    #[serde(default)]
    pub keys: StateKeys,
    #[serde(default)]
    pub maps: StateMaps,
}

/// Global / local storage allocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSchema {
    #[serde(default)]
    pub global: SchemaCounts,
    #[serde(default)]
    pub local: SchemaCounts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaCounts {
    #[serde(default)]
    pub ints: u64,
    #[serde(default)]
    pub bytes: u64,
}

/// Single-key storage declarations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateKeys {
    #[serde(default)]
    pub global: IndexMap<String, StorageKey>,
    #[serde(default)]
    pub local: IndexMap<String, StorageKey>,
    #[serde(rename = "box", default)]
    pub boxes: IndexMap<String, StorageKey>,
}

/// Key-prefix storage map declarations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateMaps {
    #[serde(default)]
    pub global: IndexMap<String, StorageMap>,
    #[serde(default)]
    pub local: IndexMap<String, StorageMap>,
    #[serde(rename = "box", default)]
    pub boxes: IndexMap<String, StorageMap>,
}

/// A single storage key; `key` is base64
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageKey {
    pub key_type: String,
    pub value_type: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

/// A family of storage slots sharing a base64 key prefix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageMap {
    pub key_type: String,
    pub value_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = r#"{
        "arcs": [4, 56],
        "name": "Hello",
        "structs": {
            "Pair": [{"name": "b", "type": "uint64"}, {"name": "a", "type": "address"}],
            "Outer": [{"name": "inner", "type": [{"name": "x", "type": "uint8"}, {"name": "y", "type": "bool"}]}]
        },
        "methods": [{
            "name": "hello",
            "args": [{"type": "string", "name": "name"}],
            "returns": {"type": "string"},
            "actions": {"create": ["NoOp"], "call": ["NoOp"]},
            "readonly": false,
            "events": []
        }],
        "state": {
            "schema": {"global": {"ints": 1, "bytes": 0}, "local": {"ints": 0, "bytes": 0}},
            "keys": {"global": {"counter": {"keyType": "AVMString", "valueType": "AVMUint64", "key": "Y291bnRlcg=="}}, "local": {}, "box": {}},
            "maps": {"global": {}, "local": {}, "box": {}}
        },
        "bareActions": {"create": [], "call": []},
        "byteCode": {"approval": "", "clear": ""}
    }"#;

    #[test]
    fn test_parse_and_preserve_order() {
        let contract: Arc56Contract = serde_json::from_str(SPEC).unwrap();
        assert_eq!(contract.name, "Hello");
        let names: Vec<&String> = contract.structs.keys().collect();
        assert_eq!(names, vec!["Pair", "Outer"]);
        let fields: Vec<&str> = contract.structs["Pair"].iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["b", "a"]);
        assert_eq!(contract.state.schema.global.ints, 1);
        assert!(contract.extra.contains_key("byteCode"));
        assert!(contract.methods[0].extra.contains_key("events"));
    }

    #[test]
    fn test_nested_field_becomes_tuple() {
        let contract: Arc56Contract = serde_json::from_str(SPEC).unwrap();
        assert_eq!(contract.structs["Outer"][0].field_type.abi_type(), "(uint8,bool)");
    }

    #[test]
    fn test_round_trip_keeps_extras() {
        let contract: Arc56Contract = serde_json::from_str(SPEC).unwrap();
        let json = serde_json::to_value(&contract).unwrap();
        assert_eq!(json["byteCode"]["approval"], "");
        assert_eq!(json["bareActions"]["create"], serde_json::json!([]));
        let again: Arc56Contract = serde_json::from_value(json).unwrap();
        assert_eq!(again, contract);
    }

    #[test]
    fn test_signature_and_selector() {
        let method = Method {
            name: "add".to_string(),
            args: vec![
                MethodArg { arg_type: "uint64".into(), ..Default::default() },
                MethodArg { arg_type: "uint64".into(), ..Default::default() },
            ],
            returns: MethodReturns { return_type: "uint128".into(), ..Default::default() },
            ..Default::default()
        };
        assert_eq!(method.signature(), "add(uint64,uint64)uint128");
        // Selector from ARC-4
        assert_eq!(method.selector(), "0x8aa3b61f");
    }

    #[test]
    fn test_missing_returns_defaults_to_void() {
        let method: Method = serde_json::from_str(r#"{"name": "noop"}"#).unwrap();
        assert_eq!(method.signature(), "noop()void");
    }
}
