//! shopqa CLI
//!
//! Command-line entry point for the product-review question-answering
//! assistant: ingest a review CSV into the vector index, then chat over it.

mod commands;

use clap::{Parser, Subcommand};
use commands::{ChatCommand, IngestCommand};
use shopqa_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// shopqa - RAG question answering over product reviews
#[derive(Parser, Debug)]
#[command(name = "shopqa")]
#[command(about = "RAG question answering over product reviews", long_about = None)]
#[command(version)]
struct Cli {
    /// Chat model provider (groq, ollama)
    #[arg(short, long, global = true, env = "SHOPQA_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "SHOPQA_MODEL")]
    model: Option<String>,

    /// Custom provider endpoint URL
    #[arg(long, global = true, env = "SHOPQA_ENDPOINT")]
    endpoint: Option<String>,

    /// Path to the SQLite vector index
    #[arg(short, long, global = true, env = "SHOPQA_INDEX")]
    index: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a review CSV and index it for retrieval
    Ingest(IngestCommand),

    /// Chat over the indexed reviews
    Chat(ChatCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    let config = config.with_overrides(
        cli.provider,
        cli.model,
        cli.endpoint,
        cli.index,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("shopqa starting");
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);
    tracing::debug!("Index: {:?}", config.index_path);

    let command_name = match &cli.command {
        Commands::Ingest(_) => "ingest",
        Commands::Chat(_) => "chat",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ingest(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
