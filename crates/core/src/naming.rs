//! Identifier normalization for generated Go code
//!
//! Turns interface, method, field and state names from an app spec into Go
//! identifiers. Word splitting understands `snake_case`, `kebab-case`, spaces
//! and camel-case humps (including acronym runs such as `XMLParser`), and a
//! closed list of abbreviations is kept fully upper-cased.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Suffix appended to identifiers that collide with a Go keyword
pub const RESERVED_SUFFIX: &str = "Val";

/// Prefix for package names that would not start with a letter
pub const PACKAGE_FILLER: &str = "pkg";

static ABBREVIATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "ID", "URL", "URI", "API", "HTTP", "HTTPS", "JSON", "XML", "SQL", "HTML", "CSS", "IP",
        "TCP", "UDP", "TLS", "SSL", "SSH", "RPC", "ABI", "SDK", "ARC", "MBR", "ASA", "NFT", "KV",
        "TX", "TXN",
    ]
    .into_iter()
    .collect()
});

static GO_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
        "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
        "return", "select", "struct", "switch", "type", "var",
    ]
    .into_iter()
    .collect()
});

/// How method names are turned into Go identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamePolicy {
    /// Split into words and re-case as PascalCase
    #[default]
    Normalize,
    /// Keep the raw name, only made legal and exported
    Preserve,
}

impl NamePolicy {
    /// Apply the policy to a raw method name
    pub fn apply(&self, raw: &str) -> String {
        match self {
            NamePolicy::Normalize => to_pascal_case(raw),
            NamePolicy::Preserve => preserve_identifier(raw),
        }
    }
}

/// Convert a `snake_case`, `kebab-case` or `camelCase` string to PascalCase.
///
/// Known abbreviations are upper-cased as a whole: `app_id` becomes `AppID`.
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for word in split_words(s) {
        let upper = word.to_uppercase();
        if is_common_abbreviation(&upper) {
            result.push_str(&upper);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(&chars.as_str().to_lowercase());
        }
    }
    result
}

/// Convert a string to lowerCamelCase.
///
/// A leading run of capitals is lowered as one word, except that the last
/// capital of the run stays upper-case when a lowercase letter follows it
/// (`IDValue` becomes `idValue`).
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars: Vec<char> = pascal.chars().collect();
    if chars.len() <= 1 {
        return pascal.to_lowercase();
    }

    let run = chars.iter().take_while(|c| c.is_uppercase()).count();
    if run > 1 {
        let low_end = if run < chars.len() { run - 1 } else { run };
        for c in chars.iter_mut().take(low_end) {
            *c = c.to_lowercase().next().unwrap_or(*c);
        }
    } else if let Some(first) = chars.first_mut() {
        *first = first.to_lowercase().next().unwrap_or(*first);
    }

    chars.into_iter().collect()
}

/// Derive a Go package name: lowercase with `-`, `_` and spaces removed.
pub fn to_package_name(s: &str) -> String {
    let name: String = s
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .collect();

    match name.chars().next() {
        Some(first) if !first.is_alphabetic() => format!("{}{}", PACKAGE_FILLER, name),
        _ => name,
    }
}

/// Package clause for a contract without an explicit package override.
///
/// Unlike [`to_package_name`] the result is never empty, holds only ASCII
/// lowercase letters and digits, and never collides with a Go keyword.
pub fn derive_package_name(s: &str) -> String {
    let name: String = to_package_name(s)
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();
    let name = match name.chars().next() {
        Some(first) if first.is_ascii_lowercase() => name,
        _ => format!("{}{}", PACKAGE_FILLER, name),
    };
    if is_go_keyword(&name) {
        format!("{}{}", name, RESERVED_SUFFIX.to_ascii_lowercase())
    } else {
        name
    }
}

/// Escape an identifier that collides with a Go keyword
pub fn safe_go_name(name: &str) -> String {
    if is_go_keyword(name) {
        format!("{}{}", name, RESERVED_SUFFIX)
    } else {
        name.to_string()
    }
}

/// Whether `name` is a reserved Go keyword
pub fn is_go_keyword(name: &str) -> bool {
    GO_KEYWORDS.contains(name)
}

/// Keep a raw name as-is apart from what Go requires: illegal characters
/// become `_`, the first letter is upper-cased so the identifier is exported,
/// and reserved words are escaped.
pub fn preserve_identifier(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (i, c) in raw.chars().enumerate() {
        let legal = c == '_' || c.is_alphanumeric();
        match (i, legal) {
            (0, true) if c.is_numeric() => {
                out.push('_');
                out.push(c);
            }
            (0, true) => out.extend(c.to_uppercase()),
            (_, true) => out.push(c),
            (_, false) => out.push('_'),
        }
    }
    safe_go_name(&out)
}

fn is_common_abbreviation(word: &str) -> bool {
    ABBREVIATIONS.contains(word)
}

/// Split on `_`, `-`, spaces and camel-case boundaries.
fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '_' | '-' | ' ') {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if i > 0 && c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
            // "XMLParser": the P ends the acronym run because "a" follows it
            if prev.is_lowercase() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}
