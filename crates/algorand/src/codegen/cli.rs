//! CLI interface for Go client generation

use super::{generate_client_code, AlgorandCodegenConfig, AppSpecParser, SpecFormat};
use appclient_common::{Error, Result};
use appclient_core::{GenerationConfig, GenerationMode, NamePolicy};
use clap::Args;
use tracing::info;

/// Arguments of the `generate` command
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Path to the ARC-56 / ARC-32 app spec JSON file
    #[arg(short = 'a', long = "application", value_name = "PATH")]
    pub application: String,

    /// Output directory for the generated Go package
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: String,

    /// Go package name (default: derived from the contract name)
    #[arg(short = 'p', long = "package", value_name = "NAME")]
    pub package: Option<String>,

    /// Generation mode: full or minimal
    #[arg(short = 'm', long = "mode", default_value = "full", value_parser = parse_mode)]
    pub mode: GenerationMode,

    /// Keep original method names instead of normalizing them
    #[arg(long = "preserve-names")]
    pub preserve_names: bool,

    /// Preview generated code without writing files
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Skip the gofmt pass over the generated files
    #[arg(long = "no-gofmt")]
    pub no_gofmt: bool,
}

/// Arguments of the `detect` command
#[derive(Debug, Clone, Args)]
pub struct DetectArgs {
    /// Path to the app spec JSON file
    #[arg(value_name = "PATH")]
    pub path: String,
}

fn parse_mode(s: &str) -> std::result::Result<GenerationMode, String> {
    s.parse::<GenerationMode>().map_err(|e| e.to_string())
}

impl GenerateArgs {
    /// Codegen configuration described by these arguments
    pub fn to_config(&self) -> AlgorandCodegenConfig {
        AlgorandCodegenConfig {
            output_dir: self.output.clone(),
            package_name: self.package.clone(),
            mode: self.mode,
            name_policy: if self.preserve_names {
                NamePolicy::Preserve
            } else {
                NamePolicy::Normalize
            },
            dry_run: self.dry_run,
            gofmt: !self.no_gofmt,
        }
    }
}

/// Handle the generate command
pub async fn handle_generate_command(args: &GenerateArgs) -> Result<()> {
    validate_app_spec_file(&args.application).await?;
    validate_output_dir(&args.output)?;
    if let Some(package) = &args.package {
        validate_package_name(package)?;
    }

    let config = args.to_config();
    info!(
        "Generating Go client from {} into {} (mode {})",
        args.application, args.output, config.mode
    );
    if config.dry_run {
        info!("Performing dry run, no files will be written");
    }

    let files = generate_client_code(&args.application, config).await?;

    if !args.dry_run {
        info!("Generated {} files in {}", files.len(), args.output);
    }
    Ok(())
}

/// Handle the detect command; returns the detected format
pub async fn handle_detect_command(args: &DetectArgs) -> Result<SpecFormat> {
    validate_app_spec_file(&args.path).await?;
    let format = AppSpecParser::new().detect_file(&args.path)?;
    println!("{}", format);
    Ok(format)
}

/// Validate the app spec file exists and holds JSON
async fn validate_app_spec_file(file_path: &str) -> Result<()> {
    if !tokio::fs::try_exists(file_path)
        .await
        .map_err(|e| Error::io(format!("Failed to check file existence: {}", e)))?
    {
        return Err(Error::validation(format!("App spec file not found: {}", file_path)));
    }

    let content = tokio::fs::read_to_string(file_path)
        .await
        .map_err(|e| Error::io(format!("Failed to read app spec file: {}", e)))?;

    let _: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| Error::validation(format!("Invalid JSON in app spec file: {}", e)))?;

    Ok(())
}

/// Validate the output directory argument
fn validate_output_dir(output: &str) -> Result<()> {
    if output.trim().is_empty() {
        return Err(Error::validation("Output directory cannot be empty"));
    }
    Ok(())
}

/// Validate a package name override
fn validate_package_name(name: &str) -> Result<()> {
    GenerationConfig::new(Some(name.to_string()), GenerationMode::Full, NamePolicy::Normalize)
        .validate()
        .map_err(Error::from)
}
