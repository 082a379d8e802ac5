use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod headless;

#[derive(Parser)]
#[command(name = "gptweb")]
#[command(about = "gptweb - editor activity logging and code-aware chat", long_about = None)]
struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Host a chat session over stdio (JSON lines in, JSON lines out)
    Chat,
    /// Validate and store an OpenAI API key
    SetKey {
        /// The API key
        key: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // stdout carries the protocol; diagnostics go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let storage = commands::open_storage(cli.config)?;

    match cli.command {
        Commands::Chat => commands::chat::run(storage).await?,
        Commands::SetKey { key } => commands::set_key::run(storage, &key).await?,
    }

    Ok(())
}
