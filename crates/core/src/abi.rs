//! ABI type expression parser
//!
//! A small recursive-descent parser over the ARC-4 type grammar:
//!
//! ```text
//! type   := base suffix*
//! base   := "(" [ type ("," type)* ] ")" | leaf
//! suffix := "[" digits? "]"
//! leaf   := any run of characters other than "(", ")", "[", "]", ","
//! ```
//!
//! Leaves are classified into primitives, transaction and foreign references;
//! anything else is kept as [`AbiType::Named`] so it can be resolved against the
//! contract's struct table later.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Deepest nesting of tuples and array suffixes accepted by the parser
pub const MAX_DEPTH: usize = 128;

static UFIXED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ufixed(\d+)x(\d+)$").expect("static regex"));

/// Transaction type that must accompany a method call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Any,
    Payment,
    ApplicationCall,
    AssetTransfer,
    AssetConfig,
    AssetFreeze,
    KeyRegistration,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 7] = [
        TransactionKind::Any,
        TransactionKind::Payment,
        TransactionKind::ApplicationCall,
        TransactionKind::AssetTransfer,
        TransactionKind::AssetConfig,
        TransactionKind::AssetFreeze,
        TransactionKind::KeyRegistration,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            TransactionKind::Any => "txn",
            TransactionKind::Payment => "pay",
            TransactionKind::ApplicationCall => "appl",
            TransactionKind::AssetTransfer => "axfer",
            TransactionKind::AssetConfig => "acfg",
            TransactionKind::AssetFreeze => "afrz",
            TransactionKind::KeyRegistration => "keyreg",
        }
    }
}

/// Foreign entity referenced by an argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Account,
    Application,
    Asset,
}

impl ReferenceKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "account" => Some(ReferenceKind::Account),
            "application" => Some(ReferenceKind::Application),
            "asset" => Some(ReferenceKind::Asset),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ReferenceKind::Account => "account",
            ReferenceKind::Application => "application",
            ReferenceKind::Asset => "asset",
        }
    }
}

/// Whether a raw argument type is one of the seven transaction tags
pub fn is_transaction_tag(tag: &str) -> bool {
    TransactionKind::from_tag(tag).is_some()
}

/// Whether a raw argument type is `account`, `application` or `asset`
pub fn is_reference_tag(tag: &str) -> bool {
    ReferenceKind::from_tag(tag).is_some()
}

/// ARC-56 aliases for raw AVM stack types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvmKind {
    Bytes,
    String,
    Uint64,
}

impl AvmKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "AVMBytes" => Some(AvmKind::Bytes),
            "AVMString" => Some(AvmKind::String),
            "AVMUint64" => Some(AvmKind::Uint64),
            _ => None,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            AvmKind::Bytes => "AVMBytes",
            AvmKind::String => "AVMString",
            AvmKind::Uint64 => "AVMUint64",
        }
    }
}

/// Syntax tree of an ABI type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiType {
    Void,
    Bool,
    Byte,
    String,
    Address,
    /// The `bytes` alias; `byte[]` parses as an array of [`AbiType::Byte`]
    Bytes,
    /// `uintN`; `text` keeps the spelling it was parsed from
    Uint { bits: u64, text: String },
    Ufixed { bits: u64, precision: u64, text: String },
    Avm(AvmKind),
    Transaction(TransactionKind),
    Reference(ReferenceKind),
    /// `T[N]` when `len` is set, `T[]` otherwise
    Array { elem: Box<AbiType>, len: Option<usize> },
    Tuple(Vec<AbiType>),
    /// Struct name or a tag this parser does not know
    Named(String),
}

impl AbiType {
    /// Parse a full type expression
    pub fn parse(input: &str) -> Result<AbiType, AbiParseError> {
        let mut parser = Parser::new(input);
        let ty = parser.parse_type(0)?;
        match parser.peek() {
            None => Ok(ty),
            Some(ch) => Err(AbiParseError::TrailingInput { pos: parser.pos, ch }),
        }
    }

    /// Canonically spelled `uintN`
    pub fn uint(bits: u64) -> AbiType {
        AbiType::Uint { bits, text: format!("uint{}", bits) }
    }

    pub fn is_transaction(&self) -> bool {
        matches!(self, AbiType::Transaction(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, AbiType::Reference(_))
    }

    fn from_leaf(leaf: &str) -> AbiType {
        match leaf {
            "void" => return AbiType::Void,
            "bool" => return AbiType::Bool,
            "byte" => return AbiType::Byte,
            "string" => return AbiType::String,
            "address" => return AbiType::Address,
            "bytes" => return AbiType::Bytes,
            _ => {}
        }
        if let Some(kind) = AvmKind::from_tag(leaf) {
            return AbiType::Avm(kind);
        }
        if let Some(kind) = TransactionKind::from_tag(leaf) {
            return AbiType::Transaction(kind);
        }
        if let Some(kind) = ReferenceKind::from_tag(leaf) {
            return AbiType::Reference(kind);
        }

        // Width is whatever integer follows the prefix, so `uint0128` is 128 bits
        if let Some(bits) = leaf.strip_prefix("uint").and_then(|w| w.parse::<u64>().ok()) {
            return AbiType::Uint { bits, text: leaf.to_string() };
        }
        if let Some(caps) = UFIXED_RE.captures(leaf) {
            if let (Ok(bits), Ok(precision)) = (caps[1].parse::<u64>(), caps[2].parse::<u64>()) {
                return AbiType::Ufixed { bits, precision, text: leaf.to_string() };
            }
        }

        AbiType::Named(leaf.to_string())
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::Void => write!(f, "void"),
            AbiType::Bool => write!(f, "bool"),
            AbiType::Byte => write!(f, "byte"),
            AbiType::String => write!(f, "string"),
            AbiType::Address => write!(f, "address"),
            AbiType::Bytes => write!(f, "bytes"),
            AbiType::Uint { text, .. } | AbiType::Ufixed { text, .. } => f.write_str(text),
            AbiType::Avm(kind) => write!(f, "{}", kind.tag()),
            AbiType::Transaction(kind) => write!(f, "{}", kind.tag()),
            AbiType::Reference(kind) => write!(f, "{}", kind.tag()),
            AbiType::Array { elem, len: Some(len) } => write!(f, "{}[{}]", elem, len),
            AbiType::Array { elem, len: None } => write!(f, "{}[]", elem),
            AbiType::Tuple(components) => {
                write!(f, "(")?;
                for (i, component) in components.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", component)?;
                }
                write!(f, ")")
            }
            AbiType::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Reasons an ABI type expression failed to parse
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbiParseError {
    #[error("unexpected end of type expression")]
    UnexpectedEnd,
    #[error("unexpected '{ch}' at position {pos}")]
    UnexpectedChar { pos: usize, ch: char },
    #[error("invalid array length '{len}' at position {pos}")]
    InvalidLength { pos: usize, len: String },
    #[error("trailing '{ch}' at position {pos}")]
    TrailingInput { pos: usize, ch: char },
    #[error("type nested deeper than {} levels at position {pos}", MAX_DEPTH)]
    TooDeep { pos: usize },
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    /// Array suffixes seen so far; each one wraps the tree a level deeper
    suffixes: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            suffixes: 0,
        }
    }

    fn check_depth(&self, depth: usize) -> Result<(), AbiParseError> {
        if depth + self.suffixes > MAX_DEPTH {
            return Err(AbiParseError::TooDeep { pos: self.pos });
        }
        Ok(())
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn expect(&mut self, want: char) -> Result<(), AbiParseError> {
        match self.peek() {
            Some(ch) if ch == want => {
                self.pos += 1;
                Ok(())
            }
            Some(ch) => Err(AbiParseError::UnexpectedChar { pos: self.pos, ch }),
            None => Err(AbiParseError::UnexpectedEnd),
        }
    }

    fn parse_type(&mut self, depth: usize) -> Result<AbiType, AbiParseError> {
        self.check_depth(depth)?;
        let mut ty = match self.peek() {
            Some('(') => self.parse_tuple(depth)?,
            _ => self.parse_leaf()?,
        };
        while self.peek() == Some('[') {
            self.suffixes += 1;
            self.check_depth(depth)?;
            let len = self.parse_suffix()?;
            ty = AbiType::Array { elem: Box::new(ty), len };
        }
        Ok(ty)
    }

    fn parse_tuple(&mut self, depth: usize) -> Result<AbiType, AbiParseError> {
        self.expect('(')?;
        let mut components = Vec::new();
        if self.peek() == Some(')') {
            self.pos += 1;
            return Ok(AbiType::Tuple(components));
        }
        loop {
            components.push(self.parse_type(depth + 1)?);
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(')') => {
                    self.pos += 1;
                    return Ok(AbiType::Tuple(components));
                }
                Some(ch) => return Err(AbiParseError::UnexpectedChar { pos: self.pos, ch }),
                None => return Err(AbiParseError::UnexpectedEnd),
            }
        }
    }

    fn parse_leaf(&mut self) -> Result<AbiType, AbiParseError> {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if matches!(ch, '(' | ')' | '[' | ']' | ',') {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return match self.peek() {
                Some(ch) => Err(AbiParseError::UnexpectedChar { pos: self.pos, ch }),
                None => Err(AbiParseError::UnexpectedEnd),
            };
        }
        let leaf: String = self.chars[start..self.pos].iter().collect();
        Ok(AbiType::from_leaf(&leaf))
    }

    fn parse_suffix(&mut self) -> Result<Option<usize>, AbiParseError> {
        self.expect('[')?;
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if ch != ']') {
            self.pos += 1;
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        self.expect(']')?;
        if digits.is_empty() {
            return Ok(None);
        }
        match digits.parse::<usize>() {
            Ok(len) if digits.chars().all(|c| c.is_ascii_digit()) => Ok(Some(len)),
            _ => Err(AbiParseError::InvalidLength { pos: start, len: digits }),
        }
    }
}

/// Split a tuple expression into its top-level component strings.
///
/// One layer of outer parentheses is stripped and the remainder is split on
/// commas at nesting depth zero, so nested tuples stay intact:
/// `((uint64,address),uint64)` gives `["(uint64,address)", "uint64"]`.
pub fn split_tuple(tuple: &str) -> Vec<String> {
    let inner = tuple.strip_prefix('(').unwrap_or(tuple);
    let inner = inner.strip_suffix(')').unwrap_or(inner);
    if inner.is_empty() {
        return Vec::new();
    }

    let mut result = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    for ch in inner.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => result.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        result.push(current);
    }
    result
}
