//! Generation configuration

use crate::naming::{is_go_keyword, NamePolicy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which output units are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// All units, including the deployment factory
    #[default]
    Full,
    /// Everything except the deployment factory
    Minimal,
}

impl GenerationMode {
    pub fn has_factory(&self) -> bool {
        matches!(self, GenerationMode::Full)
    }
}

impl FromStr for GenerationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(GenerationMode::Full),
            "minimal" => Ok(GenerationMode::Minimal),
            other => Err(ConfigError::UnknownMode { mode: other.to_string() }),
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::Full => write!(f, "full"),
            GenerationMode::Minimal => write!(f, "minimal"),
        }
    }
}

/// Options for building a generation context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Package name override; the contract name is used when absent or empty
    pub target_name: Option<String>,
    pub mode: GenerationMode,
    pub name_policy: NamePolicy,
}

impl GenerationConfig {
    pub fn new(target_name: Option<String>, mode: GenerationMode, name_policy: NamePolicy) -> Self {
        Self { target_name, mode, name_policy }
    }

    /// Non-empty package name override, if any
    pub fn package_override(&self) -> Option<&str> {
        self.target_name.as_deref().filter(|name| !name.is_empty())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(name) = self.package_override() else {
            return Ok(());
        };

        let mut chars = name.chars();
        let starts_with_letter = chars.next().map_or(false, |c| c.is_ascii_lowercase());
        let valid_rest = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !starts_with_letter || !valid_rest {
            return Err(ConfigError::InvalidPackageName { name: name.to_string() });
        }
        if is_go_keyword(name) {
            return Err(ConfigError::ReservedPackageName { name: name.to_string() });
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid package name '{name}': must be lowercase letters, digits or '_' and start with a letter")]
    InvalidPackageName { name: String },
    #[error("Invalid package name '{name}': reserved Go keyword")]
    ReservedPackageName { name: String },
    #[error("Unknown generation mode '{mode}': expected 'full' or 'minimal'")]
    UnknownMode { mode: String },
}

impl From<ConfigError> for appclient_common::Error {
    fn from(err: ConfigError) -> Self {
        appclient_common::Error::config(err.to_string())
    }
}
