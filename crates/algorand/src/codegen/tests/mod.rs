//! Tests for app spec loading and Go client generation

mod integration;

use super::parser::{detect_format, AppSpecParser, SpecFormat};
use appclient_common::Error;
use serde_json::json;

/// Minimal ARC-56 document with one creatable method
pub const HELLO_ARC56: &str = r#"{
  "arcs": [4, 56],
  "name": "HelloWorld",
  "desc": "Says hello",
  "structs": {},
  "methods": [
    {
      "name": "hello",
      "args": [{"type": "string", "name": "name"}],
      "returns": {"type": "string"},
      "actions": {"create": ["NoOp"], "call": ["NoOp"]},
      "readonly": false,
      "events": []
    }
  ],
  "state": {
    "schema": {"global": {"ints": 0, "bytes": 0}, "local": {"ints": 0, "bytes": 0}},
    "keys": {"global": {}, "local": {}, "box": {}},
    "maps": {"global": {}, "local": {}, "box": {}}
  },
  "bareActions": {"create": [], "call": []},
  "byteCode": {"approval": "", "clear": ""}
}"#;

/// ARC-32 document exercising hints, structs, declared state and bare calls
pub const CALCULATOR_ARC32: &str = r#"{
  "hints": {
    "add(uint64,uint64)uint64": {"call_config": {"no_op": "CALL"}, "read_only": true},
    "create()void": {"call_config": {"no_op": "CREATE"}},
    "register((address,uint64))(address,uint64)": {
      "call_config": {"no_op": "ALL", "opt_in": "CALL"},
      "structs": {
        "info": {"name": "UserInfo", "elements": [["owner", "address"], ["balance", "uint64"]]},
        "output": {"name": "UserInfo", "elements": [["owner", "address"], ["balance", "uint64"]]}
      }
    }
  },
  "source": {"approval": "I3ByYWdtYQ==", "clear": "I3ByYWdtYQ=="},
  "state": {
    "global": {"num_byte_slices": 1, "num_uints": 1},
    "local": {"num_byte_slices": 0, "num_uints": 1}
  },
  "schema": {
    "global": {
      "declared": {
        "counter": {"type": "uint64", "key": "counter", "descr": "Call count"},
        "owner": {"type": "bytes", "key": "own", "descr": ""}
      },
      "reserved": {}
    },
    "local": {
      "declared": {"points": {"type": "uint64", "key": "p"}},
      "reserved": {}
    }
  },
  "contract": {
    "name": "Calculator",
    "desc": "Adds numbers",
    "methods": [
      {"name": "add", "args": [{"type": "uint64", "name": "a"}, {"type": "uint64", "name": "b"}], "returns": {"type": "uint64"}},
      {"name": "create", "args": [], "returns": {"type": "void"}},
      {"name": "register", "args": [{"type": "(address,uint64)", "name": "info"}], "returns": {"type": "(address,uint64)"}}
    ],
    "networks": {}
  },
  "bare_call_config": {"no_op": "CREATE", "opt_in": "CALL", "delete_application": "NEVER"}
}"#;

#[test]
fn test_detect_format() {
    assert_eq!(detect_format(&json!({"methods": [], "bareActions": {}})), SpecFormat::Arc56);
    assert_eq!(detect_format(&json!({"contract": {}, "hints": {}})), SpecFormat::Arc32);
    // The contract key wins even next to ARC-56 keys
    assert_eq!(
        detect_format(&json!({"contract": {}, "methods": [], "bareActions": {}})),
        SpecFormat::Arc32
    );
    assert_eq!(detect_format(&json!({"methods": []})), SpecFormat::Unknown);
    assert_eq!(detect_format(&json!([1, 2])), SpecFormat::Unknown);
    assert_eq!(SpecFormat::Arc56.to_string(), "arc56");
}

#[test]
fn test_parse_arc56() {
    let contract = AppSpecParser::new().parse_content(HELLO_ARC56).unwrap();
    assert_eq!(contract.name, "HelloWorld");
    assert_eq!(contract.methods.len(), 1);
    assert_eq!(contract.methods[0].signature(), "hello(string)string");
    assert!(contract.extra.contains_key("byteCode"));
}

#[test]
fn test_parse_errors() {
    let parser = AppSpecParser::new();
    assert!(matches!(parser.parse_content("{"), Err(Error::Parse(_))));
    assert!(matches!(parser.parse_content(r#"{"name": "x"}"#), Err(Error::Parse(_))));
    assert!(matches!(
        parser.parse_content(r#"{"contract": {"methods": []}}"#),
        Err(Error::Parse(_))
    ));
}

#[test]
fn test_arc32_methods_and_hints() {
    let contract = AppSpecParser::new().parse_content(CALCULATOR_ARC32).unwrap();
    assert_eq!(contract.name, "Calculator");
    assert_eq!(contract.desc.as_deref(), Some("Adds numbers"));

    let add = contract.method("add").unwrap();
    assert!(add.readonly);
    assert_eq!(add.actions.call, vec!["NoOp"]);
    assert!(add.actions.create.is_empty());

    let create = contract.method("create").unwrap();
    assert_eq!(create.actions.create, vec!["NoOp"]);
    assert!(create.actions.call.is_empty());
    assert!(!create.readonly);

    let register = contract.method("register").unwrap();
    assert_eq!(register.actions.create, vec!["NoOp"]);
    assert_eq!(register.actions.call, vec!["NoOp", "OptIn"]);
    assert_eq!(register.args[0].struct_name.as_deref(), Some("UserInfo"));
    assert_eq!(register.returns.struct_name.as_deref(), Some("UserInfo"));

    let fields: Vec<&str> = contract.structs["UserInfo"].iter().map(|f| f.name.as_str()).collect();
    assert_eq!(fields, vec!["owner", "balance"]);
}

#[test]
fn test_arc32_state_and_bare_calls() {
    let contract = AppSpecParser::new().parse_content(CALCULATOR_ARC32).unwrap();

    let counter = &contract.state.keys.global["counter"];
    assert_eq!(counter.key, "Y291bnRlcg==");
    assert_eq!(counter.key_type, "AVMString");
    assert_eq!(counter.value_type, "AVMUint64");
    assert_eq!(counter.desc.as_deref(), Some("Call count"));

    let owner = &contract.state.keys.global["owner"];
    assert_eq!(owner.key, "b3du");
    assert_eq!(owner.value_type, "AVMBytes");
    assert_eq!(owner.desc, None);

    assert_eq!(contract.state.keys.local["points"].key, "cA==");
    assert_eq!(contract.state.schema.global.ints, 1);
    assert_eq!(contract.state.schema.global.bytes, 1);
    assert_eq!(contract.state.schema.local.ints, 1);

    assert_eq!(contract.bare_actions.create, vec!["NoOp"]);
    assert_eq!(contract.bare_actions.call, vec!["OptIn"]);
    assert_eq!(contract.extra["source"]["approval"], "I3ByYWdtYQ==");
}

#[test]
fn test_arc32_declared_order_is_kept() {
    let contract = AppSpecParser::new().parse_content(CALCULATOR_ARC32).unwrap();
    let names: Vec<&String> = contract.state.keys.global.keys().collect();
    assert_eq!(names, vec!["counter", "owner"]);
}
