//! DocQuery CLI — the main entry point.
//!
//! Commands:
//! - `ask`      — Answer one question and print the sources
//! - `serve`    — Start the HTTP gateway and web UI
//! - `doctor`   — Check config and reach both collaborators
//! - `onboard`  — Write a default config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "docquery",
    about = "DocQuery — ask questions about a documentation collection",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ~/.docquery/config.toml)
    #[arg(short, long, global = true, env = "DOCQUERY_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question
    Ask {
        /// The question
        query: String,

        /// Number of chunks to retrieve (at most 5 are used)
        #[arg(short = 'n', long)]
        num_chunks: Option<usize>,

        /// Print the result record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP gateway and web UI
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Diagnose configuration and connectivity
    Doctor,

    /// Write a default configuration file
    Onboard,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Ask {
            query,
            num_chunks,
            json,
        } => commands::ask::run(config_path, &query, num_chunks, json).await?,
        Commands::Serve { port } => commands::serve::run(config_path, port).await?,
        Commands::Doctor => commands::doctor::run(config_path).await?,
        Commands::Onboard => commands::onboard::run(config_path).await?,
    }

    Ok(())
}
