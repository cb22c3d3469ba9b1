//! Command-line interface definition.

use clap::{Parser, Subcommand};

/// chatlens: linked chat session monitor and conversation analyzer.
#[derive(Debug, Parser)]
#[command(name = "chatlens", version, about)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print command output as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP and WebSocket server.
    Serve {
        /// Address to bind (overrides config.toml).
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config.toml).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Analyze the embeddings already stored for a chat.
    Analyze {
        /// Chat identifier as reported by the messaging client.
        chat_id: String,
    },
}
