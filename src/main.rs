/// App client generator entry point
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use appclient_algorand::codegen::cli::{
    handle_detect_command, handle_generate_command, DetectArgs, GenerateArgs,
};

#[derive(Parser)]
#[command(name = "appclient")]
#[command(author, version, about = "Generate typed Go clients for Algorand applications", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a typed Go client from an ARC-56 / ARC-32 app spec
    Generate(GenerateArgs),

    /// Print the dialect of an app spec file (arc56, arc32 or unknown)
    Detect(DetectArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flag
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match cli.command {
        Commands::Generate(args) => handle_generate_command(&args).await?,
        Commands::Detect(args) => {
            handle_detect_command(&args).await?;
        }
    }

    Ok(())
}
