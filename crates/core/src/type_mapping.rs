//! ABI type to Go type mapping
//!
//! Resolution order for every node of a type expression: struct table first,
//! then the fixed primitive table, then big integers / fixed-point, then
//! arrays, then tuples. Nothing here fails; expressions that cannot be parsed
//! or resolved map to [`TargetType::Unresolved`], which keeps the raw text.

use crate::abi::{AbiType, AvmKind, ReferenceKind};
use crate::arc56::StructTable;
use crate::naming::to_pascal_case;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Import path for `*big.Int` / `*big.Rat`
pub const IMPORT_MATH_BIG: &str = "math/big";
/// Import path for `types.Address`
pub const IMPORT_SDK_TYPES: &str = "github.com/algorand/go-algorand-sdk/v2/types";
/// Import path for `transaction.TransactionWithSigner`
pub const IMPORT_SDK_TRANSACTION: &str = "github.com/algorand/go-algorand-sdk/v2/transaction";
/// Import path for the runtime library the generated client targets
pub const IMPORT_ALGOKIT: &str = "github.com/kylebeee/algokit-utils-go";

/// Go scalar and library types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoPrimitive {
    Bool,
    Byte,
    String,
    Bytes,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Address,
    BigInt,
    BigRat,
    TransactionWithSigner,
}

impl GoPrimitive {
    pub fn go_type(&self) -> &'static str {
        match self {
            GoPrimitive::Bool => "bool",
            GoPrimitive::Byte => "byte",
            GoPrimitive::String => "string",
            GoPrimitive::Bytes => "[]byte",
            GoPrimitive::Uint8 => "uint8",
            GoPrimitive::Uint16 => "uint16",
            GoPrimitive::Uint32 => "uint32",
            GoPrimitive::Uint64 => "uint64",
            GoPrimitive::Address => "types.Address",
            GoPrimitive::BigInt => "*big.Int",
            GoPrimitive::BigRat => "*big.Rat",
            GoPrimitive::TransactionWithSigner => "transaction.TransactionWithSigner",
        }
    }

    /// Import the emitted type needs, if any
    pub fn import(&self) -> Option<&'static str> {
        match self {
            GoPrimitive::Address => Some(IMPORT_SDK_TYPES),
            GoPrimitive::BigInt | GoPrimitive::BigRat => Some(IMPORT_MATH_BIG),
            GoPrimitive::TransactionWithSigner => Some(IMPORT_SDK_TRANSACTION),
            _ => None,
        }
    }
}

/// Why a type could not be resolved to something precise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedShape {
    /// An unnamed tuple: emitted as a heterogeneous slice
    Tuple,
    /// Unknown tag or malformed expression
    Unknown,
}

/// Target-language type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetType {
    Void,
    Primitive(GoPrimitive),
    Struct(String),
    Array { len: usize, elem: Box<TargetType> },
    Slice(Box<TargetType>),
    Unresolved { raw: String, shape: UnresolvedShape },
}

impl TargetType {
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            TargetType::Array { .. } | TargetType::Slice(_) | TargetType::Unresolved { .. }
        )
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Void => Ok(()),
            TargetType::Primitive(p) => f.write_str(p.go_type()),
            TargetType::Struct(name) => f.write_str(name),
            TargetType::Array { len, elem } => write!(f, "[{}]{}", len, elem),
            TargetType::Slice(elem) => write!(f, "[]{}", elem),
            TargetType::Unresolved { shape: UnresolvedShape::Tuple, .. } => {
                f.write_str("[]interface{}")
            }
            TargetType::Unresolved { shape: UnresolvedShape::Unknown, .. } => {
                f.write_str("interface{}")
            }
        }
    }
}

/// Result of mapping one ABI type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    pub target: TargetType,
    /// Go import paths the emitted type depends on
    pub imports: BTreeSet<String>,
}

impl TypeMapping {
    fn new(target: TargetType) -> Self {
        Self { target, imports: BTreeSet::new() }
    }

    fn primitive(p: GoPrimitive) -> Self {
        let mut mapping = Self::new(TargetType::Primitive(p));
        if let Some(import) = p.import() {
            mapping.imports.insert(import.to_string());
        }
        mapping
    }

    fn new_unresolved(raw: &str, shape: UnresolvedShape) -> Self {
        Self::new(TargetType::Unresolved { raw: raw.to_string(), shape })
    }

    /// Go source text of the type; empty for void
    pub fn go_type(&self) -> String {
        self.target.to_string()
    }

    pub fn is_void(&self) -> bool {
        self.target == TargetType::Void
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.target, TargetType::Struct(_))
    }

    pub fn struct_name(&self) -> Option<&str> {
        match &self.target {
            TargetType::Struct(name) => Some(name),
            _ => None,
        }
    }

    /// Raw expression that could not be resolved
    pub fn unresolved(&self) -> Option<&str> {
        match &self.target {
            TargetType::Unresolved { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

impl Serialize for TypeMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TypeMapping", 6)?;
        state.serialize_field("goType", &self.go_type())?;
        state.serialize_field("isVoid", &self.is_void())?;
        state.serialize_field("isStruct", &self.is_struct())?;
        state.serialize_field("structName", &self.struct_name())?;
        state.serialize_field("unresolved", &self.unresolved())?;
        state.serialize_field("imports", &self.imports)?;
        state.end()
    }
}

/// Maps ABI type expressions against a contract's struct table
pub struct TypeMapper<'a> {
    structs: &'a StructTable,
}

impl<'a> TypeMapper<'a> {
    pub fn new(structs: &'a StructTable) -> Self {
        Self { structs }
    }

    /// Map with an explicit struct name taking precedence over `expr`
    pub fn map_named(&self, expr: &str, struct_name: Option<&str>) -> TypeMapping {
        match struct_name {
            Some(name) if !name.is_empty() && self.structs.contains_key(name) => {
                self.struct_mapping(name)
            }
            _ => self.map(expr),
        }
    }

    /// Map an ABI type expression
    pub fn map(&self, expr: &str) -> TypeMapping {
        if self.structs.contains_key(expr) {
            return self.struct_mapping(expr);
        }
        match AbiType::parse(expr) {
            Ok(ty) => self.map_node(&ty),
            Err(err) => {
                tracing::debug!("Unparseable ABI type '{}': {}", expr, err);
                TypeMapping::new_unresolved(expr, UnresolvedShape::Unknown)
            }
        }
    }

    fn struct_mapping(&self, name: &str) -> TypeMapping {
        TypeMapping::new(TargetType::Struct(to_pascal_case(name)))
    }

    fn map_node(&self, ty: &AbiType) -> TypeMapping {
        let text = ty.to_string();
        if self.structs.contains_key(&text) {
            return self.struct_mapping(&text);
        }

        match ty {
            AbiType::Void => TypeMapping::new(TargetType::Void),
            AbiType::Bool => TypeMapping::primitive(GoPrimitive::Bool),
            AbiType::Byte => TypeMapping::primitive(GoPrimitive::Byte),
            AbiType::String | AbiType::Avm(AvmKind::String) => {
                TypeMapping::primitive(GoPrimitive::String)
            }
            AbiType::Address => TypeMapping::primitive(GoPrimitive::Address),
            AbiType::Bytes | AbiType::Avm(AvmKind::Bytes) => {
                TypeMapping::primitive(GoPrimitive::Bytes)
            }
            AbiType::Array { elem, len: None } if **elem == AbiType::Byte => {
                TypeMapping::primitive(GoPrimitive::Bytes)
            }
            AbiType::Avm(AvmKind::Uint64) => TypeMapping::primitive(GoPrimitive::Uint64),
            AbiType::Uint { bits, .. } if *bits > 64 => {
                TypeMapping::primitive(GoPrimitive::BigInt)
            }
            // Fixed widths only match their exact spelling
            AbiType::Uint { .. } => match text.as_str() {
                "uint8" => TypeMapping::primitive(GoPrimitive::Uint8),
                "uint16" => TypeMapping::primitive(GoPrimitive::Uint16),
                "uint32" => TypeMapping::primitive(GoPrimitive::Uint32),
                "uint64" => TypeMapping::primitive(GoPrimitive::Uint64),
                _ => {
                    tracing::debug!("Unresolved ABI type '{}'", text);
                    TypeMapping::new_unresolved(&text, UnresolvedShape::Unknown)
                }
            },
            AbiType::Ufixed { .. } => TypeMapping::primitive(GoPrimitive::BigRat),
            // Call signatures accept any signed transaction, whatever its type
            AbiType::Transaction(_) => TypeMapping::primitive(GoPrimitive::TransactionWithSigner),
            AbiType::Reference(ReferenceKind::Account) => {
                TypeMapping::primitive(GoPrimitive::String)
            }
            AbiType::Reference(ReferenceKind::Application | ReferenceKind::Asset) => {
                TypeMapping::primitive(GoPrimitive::Uint64)
            }
            AbiType::Array { elem, len } => {
                let elem = self.map_node(elem);
                let target = match len {
                    Some(len) => TargetType::Array { len: *len, elem: Box::new(elem.target) },
                    None => TargetType::Slice(Box::new(elem.target)),
                };
                TypeMapping { target, imports: elem.imports }
            }
            AbiType::Tuple(_) => TypeMapping::new_unresolved(&text, UnresolvedShape::Tuple),
            AbiType::Named(_) => {
                tracing::debug!("Unresolved ABI type '{}'", text);
                TypeMapping::new_unresolved(&text, UnresolvedShape::Unknown)
            }
        }
    }
}

/// Order import paths: standard library first, then modules, each sorted
pub fn sort_imports<'a, I>(imports: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let (mut stdlib, mut external): (Vec<String>, Vec<String>) =
        imports.into_iter().cloned().partition(|imp| !imp.contains('.'));
    stdlib.sort();
    stdlib.dedup();
    external.sort();
    external.dedup();
    stdlib.extend(external);
    stdlib
}
