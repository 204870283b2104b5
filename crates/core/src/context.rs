//! Generation context construction
//!
//! [`build_context`] walks a parsed contract once and produces everything the
//! renderer needs: normalized identifiers, type mappings, call configurations,
//! state layout and the aggregated import list. It performs no I/O and never
//! fails.

use crate::abi::{is_reference_tag, is_transaction_tag};
use crate::arc56::{Arc56Contract, Method, StorageKey, StorageMap};
use crate::call_config::{analyze, analyze_bare_actions, BareCallConfig, CallConfig};
use crate::config::GenerationConfig;
use crate::naming::{
    derive_package_name, safe_go_name, to_camel_case, to_pascal_case, NamePolicy,
};
use crate::type_mapping::{sort_imports, TypeMapper, TypeMapping};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// Everything the renderer consumes for one contract
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationContext {
    pub package_name: String,
    pub contract_name: String,
    pub original_name: String,
    pub description: Option<String>,
    pub methods: Vec<MethodDescriptor>,
    pub structs: Vec<StructDescriptor>,
    pub state: StateLayout,
    pub bare_config: BareCallConfig,
    pub has_factory: bool,
    pub has_create_method: bool,
    pub create_method: Option<CreateMethod>,
    /// Deduplicated imports, standard library first
    pub imports: Vec<String>,
    pub collisions: Vec<NameCollision>,
    pub name_policy: NamePolicy,
}

impl GenerationContext {
    pub fn method(&self, original_name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.original_name == original_name)
    }
}

/// How an argument is supplied to a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgKind {
    /// Encoded into the ABI argument list
    Value,
    /// A transaction placed in the group before the call
    Transaction,
    /// An account, application or asset placed in the foreign arrays
    Reference,
}

impl ArgKind {
    fn classify(abi_type: &str) -> Self {
        if is_transaction_tag(abi_type) {
            ArgKind::Transaction
        } else if is_reference_tag(abi_type) {
            ArgKind::Reference
        } else {
            ArgKind::Value
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgDescriptor {
    /// Exported field name in the args struct
    pub name: String,
    /// Function parameter name
    pub param_name: String,
    pub original_name: String,
    pub abi_type: String,
    pub mapping: TypeMapping,
    pub kind: ArgKind,
    pub struct_name: Option<String>,
    pub desc: Option<String>,
}

impl ArgDescriptor {
    pub fn is_transaction(&self) -> bool {
        self.kind == ArgKind::Transaction
    }

    pub fn is_reference(&self) -> bool {
        self.kind == ArgKind::Reference
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    pub name: String,
    pub original_name: String,
    pub signature: String,
    pub selector: String,
    pub args: Vec<ArgDescriptor>,
    pub returns: TypeMapping,
    pub return_abi_type: String,
    pub call_config: CallConfig,
    pub desc: Option<String>,
    /// ABI types of the arguments that are not transactions
    pub abi_arg_types: Vec<String>,
}

impl MethodDescriptor {
    /// Arguments excluding transactions, in declaration order
    pub fn non_transaction_args(&self) -> impl Iterator<Item = &ArgDescriptor> {
        self.args.iter().filter(|a| !a.is_transaction())
    }

    pub fn has_non_void_return(&self) -> bool {
        !self.returns.is_void()
    }

    pub fn has_args(&self) -> bool {
        !self.args.is_empty()
    }

    pub fn args_struct_name(&self) -> String {
        format!("{}Args", self.name)
    }

    pub fn result_struct_name(&self) -> String {
        format!("{}MethodResult", self.name)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructDescriptor {
    pub name: String,
    pub original_name: String,
    pub fields: Vec<StructFieldDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructFieldDescriptor {
    pub name: String,
    pub abi_type: String,
    pub mapping: TypeMapping,
    /// Original field name, used as the JSON tag
    pub json_tag: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateKeyDescriptor {
    pub name: String,
    pub original_name: String,
    /// Base64 key bytes
    pub key: String,
    pub key_type: String,
    pub value_abi_type: String,
    pub value: TypeMapping,
    pub desc: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMapDescriptor {
    pub name: String,
    pub original_name: String,
    /// Base64 key prefix; empty when the map has none
    pub prefix: String,
    pub key_abi_type: String,
    pub key: TypeMapping,
    pub value_abi_type: String,
    pub value: TypeMapping,
    pub desc: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateLayout {
    pub global: Vec<StateKeyDescriptor>,
    pub local: Vec<StateKeyDescriptor>,
    pub boxes: Vec<StateKeyDescriptor>,
    pub box_maps: Vec<StateMapDescriptor>,
    pub has_global: bool,
    pub has_local: bool,
    /// Box keys or box maps are declared
    pub has_box: bool,
    pub has_box_maps: bool,
}

impl StateLayout {
    /// Imports needed by state value and map key types
    pub fn imports(&self) -> BTreeSet<String> {
        let keys = self.global.iter().chain(&self.local).chain(&self.boxes);
        let mut imports: BTreeSet<String> =
            keys.flat_map(|k| k.value.imports.iter().cloned()).collect();
        for map in &self.box_maps {
            imports.extend(map.key.imports.iter().cloned());
            imports.extend(map.value.imports.iter().cloned());
        }
        imports
    }
}

/// The method the deployment factory uses to create the application
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMethod {
    pub name: String,
    pub original_name: String,
    pub signature: String,
    /// Whether it takes any non-transaction arguments
    pub has_args: bool,
    pub args_struct_name: String,
}

/// One generated identifier produced by more than one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameCollision {
    pub scope: String,
    pub identifier: String,
    pub sources: Vec<String>,
}

/// Per-invocation record of generated identifiers by scope
#[derive(Debug, Default)]
struct UsedNames {
    scopes: IndexMap<String, IndexMap<String, Vec<String>>>,
}

impl UsedNames {
    fn record(&mut self, scope: &str, identifier: &str, source: impl Into<String>) {
        let source = source.into();
        let sources = self
            .scopes
            .entry(scope.to_string())
            .or_default()
            .entry(identifier.to_string())
            .or_default();
        if !sources.contains(&source) {
            sources.push(source);
        }
    }

    fn into_collisions(self) -> Vec<NameCollision> {
        let mut collisions = Vec::new();
        for (scope, names) in self.scopes {
            for (identifier, sources) in names {
                if sources.len() > 1 {
                    collisions.push(NameCollision {
                        scope: scope.clone(),
                        identifier,
                        sources,
                    });
                }
            }
        }
        collisions
    }
}

/// Builds a [`GenerationContext`] from one contract
pub struct ContextBuilder<'a> {
    contract: &'a Arc56Contract,
    config: &'a GenerationConfig,
    mapper: TypeMapper<'a>,
    imports: BTreeSet<String>,
    used: UsedNames,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(contract: &'a Arc56Contract, config: &'a GenerationConfig) -> Self {
        Self {
            contract,
            config,
            mapper: TypeMapper::new(&contract.structs),
            imports: BTreeSet::new(),
            used: UsedNames::default(),
        }
    }

    pub fn build(mut self) -> GenerationContext {
        let contract = self.contract;
        let contract_name = to_pascal_case(&contract.name);
        let package_name = match self.config.package_override() {
            Some(name) => name.to_string(),
            None => derive_package_name(&contract.name),
        };
        debug!(
            "Building context for '{}' (package '{}', mode {})",
            contract.name, package_name, self.config.mode
        );

        let structs = self.build_structs();
        let methods = self.build_methods();

        let create_method = methods.iter().find(|m| m.call_config.can_create).map(|m| CreateMethod {
            name: m.name.clone(),
            original_name: m.original_name.clone(),
            signature: m.signature.clone(),
            has_args: m.non_transaction_args().next().is_some(),
            args_struct_name: m.args_struct_name(),
        });

        let bare_config = analyze_bare_actions(&contract.bare_actions);
        let state = self.build_state();

        let imports = sort_imports(&self.imports);
        let collisions = self.used.into_collisions();
        for collision in &collisions {
            debug!(
                "Identifier '{}' in scope '{}' produced by {:?}",
                collision.identifier, collision.scope, collision.sources
            );
        }

        GenerationContext {
            package_name,
            contract_name,
            original_name: contract.name.clone(),
            description: contract.desc.clone(),
            methods,
            structs,
            state,
            bare_config,
            has_factory: self.config.mode.has_factory(),
            has_create_method: create_method.is_some(),
            create_method,
            imports,
            collisions,
            name_policy: self.config.name_policy,
        }
    }

    fn track(&mut self, mapping: &TypeMapping) {
        self.imports.extend(mapping.imports.iter().cloned());
    }

    fn build_structs(&mut self) -> Vec<StructDescriptor> {
        let contract = self.contract;
        let mut structs = Vec::with_capacity(contract.structs.len());

        for (raw_name, fields) in &contract.structs {
            let name = to_pascal_case(raw_name);
            self.used.record("types", &name, format!("struct {}", raw_name));

            let scope = format!("fields:{}", name);
            let mut descriptors = Vec::with_capacity(fields.len());
            for field in fields {
                let abi_type = field.field_type.abi_type();
                let mapping = self.mapper.map(&abi_type);
                self.track(&mapping);

                let field_name = to_pascal_case(&field.name);
                self.used.record(&scope, &field_name, field.name.clone());
                descriptors.push(StructFieldDescriptor {
                    name: field_name,
                    abi_type,
                    mapping,
                    json_tag: field.name.clone(),
                });
            }

            structs.push(StructDescriptor {
                name,
                original_name: raw_name.clone(),
                fields: descriptors,
            });
        }

        structs
    }

    fn build_methods(&mut self) -> Vec<MethodDescriptor> {
        let contract = self.contract;
        contract.methods.iter().map(|m| self.build_method(m)).collect()
    }

    fn build_method(&mut self, method: &Method) -> MethodDescriptor {
        let name = self.config.name_policy.apply(&method.name);
        let signature = method.signature();
        self.used.record("methods", &name, signature.clone());

        let scope = format!("args:{}", method.name);
        let mut args = Vec::with_capacity(method.args.len());
        let mut abi_arg_types = Vec::new();

        for (i, arg) in method.args.iter().enumerate() {
            let original_name = arg.name.clone().unwrap_or_else(|| format!("arg{}", i));
            let mapping = self.mapper.map_named(&arg.arg_type, arg.struct_name.as_deref());
            self.track(&mapping);

            let kind = ArgKind::classify(&arg.arg_type);
            if kind != ArgKind::Transaction {
                abi_arg_types.push(arg.arg_type.clone());
            }

            let arg_name = to_pascal_case(&original_name);
            self.used.record(&scope, &arg_name, original_name.clone());
            args.push(ArgDescriptor {
                name: arg_name,
                param_name: safe_go_name(&to_camel_case(&original_name)),
                original_name,
                abi_type: arg.arg_type.clone(),
                struct_name: mapping.struct_name().map(str::to_string),
                mapping,
                kind,
                desc: arg.desc.clone(),
            });
        }

        let returns = self
            .mapper
            .map_named(&method.returns.return_type, method.returns.struct_name.as_deref());
        self.track(&returns);

        let descriptor = MethodDescriptor {
            name,
            original_name: method.name.clone(),
            selector: method.selector(),
            signature,
            args,
            returns,
            return_abi_type: method.returns.return_type.clone(),
            call_config: analyze(method),
            desc: method.desc.clone(),
            abi_arg_types,
        };

        if descriptor.has_args() {
            self.used.record(
                "types",
                &descriptor.args_struct_name(),
                format!("method {} args", descriptor.signature),
            );
        }
        if descriptor.has_non_void_return() {
            self.used.record(
                "types",
                &descriptor.result_struct_name(),
                format!("method {} result", descriptor.signature),
            );
        }

        descriptor
    }

    fn build_state(&mut self) -> StateLayout {
        let contract = self.contract;
        let keys = &contract.state.keys;
        let maps = &contract.state.maps;

        let global = self.build_keys("global", &keys.global);
        let local = self.build_keys("local", &keys.local);
        let boxes = self.build_keys("box", &keys.boxes);
        let box_maps: Vec<StateMapDescriptor> = maps
            .boxes
            .iter()
            .map(|(raw_name, map)| self.build_map(raw_name, map))
            .collect();

        StateLayout {
            has_global: !global.is_empty(),
            has_local: !local.is_empty(),
            has_box: !boxes.is_empty() || !box_maps.is_empty(),
            has_box_maps: !box_maps.is_empty(),
            global,
            local,
            boxes,
            box_maps,
        }
    }

    fn build_keys(
        &mut self,
        scope: &str,
        keys: &IndexMap<String, StorageKey>,
    ) -> Vec<StateKeyDescriptor> {
        keys.iter()
            .map(|(raw_name, key)| {
                let value = self.mapper.map(&key.value_type);
                self.track(&value);

                let name = to_pascal_case(raw_name);
                self.used.record(scope, &name, format!("key {}", raw_name));
                StateKeyDescriptor {
                    name,
                    original_name: raw_name.clone(),
                    key: key.key.clone(),
                    key_type: key.key_type.clone(),
                    value_abi_type: key.value_type.clone(),
                    value,
                    desc: key.desc.clone(),
                }
            })
            .collect()
    }

    fn build_map(&mut self, raw_name: &str, map: &StorageMap) -> StateMapDescriptor {
        let key = self.mapper.map(&map.key_type);
        let value = self.mapper.map(&map.value_type);
        self.track(&key);
        self.track(&value);

        let name = to_pascal_case(raw_name);
        self.used.record("box", &name, format!("map {}", raw_name));
        StateMapDescriptor {
            name,
            original_name: raw_name.to_string(),
            prefix: map.prefix.clone().unwrap_or_default(),
            key_abi_type: map.key_type.clone(),
            key,
            value_abi_type: map.value_type.clone(),
            value,
            desc: map.desc.clone(),
        }
    }
}

/// Build the generation context for `contract`
pub fn build_context(contract: &Arc56Contract, config: &GenerationConfig) -> GenerationContext {
    ContextBuilder::new(contract, config).build()
}
