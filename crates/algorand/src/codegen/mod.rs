//! Code generation for Algorand applications
//!
//! This module turns ARC-56 (or ARC-32) application specifications into a typed
//! Go client package: an embedded app spec, struct and argument types, a call
//! client, a transaction-group composer and optionally a deployment factory.

pub mod cli;
pub mod generator;
pub mod parser;
pub mod templates;

#[cfg(test)]
mod tests;

pub use generator::AlgorandClientCodegen;
pub use parser::{detect_format, AppSpecParser, SpecFormat};

use appclient_common::Result;
use appclient_core::{GenerationMode, NamePolicy};
use std::path::PathBuf;

/// Configuration for Go client generation
#[derive(Debug, Clone)]
pub struct AlgorandCodegenConfig {
    /// Output directory for the generated package
    pub output_dir: String,
    /// Package name override; derived from the contract name when absent
    pub package_name: Option<String>,
    pub mode: GenerationMode,
    pub name_policy: NamePolicy,
    /// Print files instead of writing them
    pub dry_run: bool,
    /// Run `gofmt -w` over the written files; a missing `gofmt` is only a warning
    pub gofmt: bool,
}

impl Default for AlgorandCodegenConfig {
    fn default() -> Self {
        Self {
            output_dir: "./generated".to_string(),
            package_name: None,
            mode: GenerationMode::Full,
            name_policy: NamePolicy::Normalize,
            dry_run: false,
            gofmt: true,
        }
    }
}

/// Main entry point for Go client generation
pub async fn generate_client_code(
    app_spec_path: &str,
    config: AlgorandCodegenConfig,
) -> Result<Vec<PathBuf>> {
    let parser = AppSpecParser::new();
    let contract = parser.parse_file(app_spec_path)?;

    let codegen = AlgorandClientCodegen::new(config)?;
    codegen.generate_all(&contract).await
}
