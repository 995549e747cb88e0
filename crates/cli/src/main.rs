//! Persona CLI — the main entry point.
//!
//! Commands:
//! - `serve` — Start the HTTP gateway
//! - `chat`  — Send a single message through the local pipeline

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "persona",
    about = "Persona — role-conditioned conversational agent service",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Send a single message and print the reply
    Chat {
        /// The message to send
        message: String,

        /// The persona role for this request
        #[arg(short, long, default_value = "assistant")]
        role: String,

        /// Thread id to continue an existing conversation
        #[arg(short, long)]
        thread: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(&cli.config, port).await?,
        Commands::Chat {
            message,
            role,
            thread,
        } => commands::chat::run(&cli.config, message, role, thread).await?,
    }

    Ok(())
}
