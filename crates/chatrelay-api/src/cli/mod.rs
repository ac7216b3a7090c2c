//! CLI command definitions for the `chatrelay` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod format;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Relay chat prompts to a generative model over HTTP.
#[derive(Parser)]
#[command(name = "chatrelay", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Export spans with the OpenTelemetry stdout exporter.
    #[arg(long, global = true)]
    pub otel: bool,

    /// Configuration file (default: ./chatrelay.toml if present).
    #[arg(long, global = true, env = "CHATRELAY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the relay HTTP server.
    Serve {
        /// Port to listen on (overrides config and PORT).
        #[arg(long)]
        port: Option<u16>,

        /// Host to bind to (overrides config and HOST).
        #[arg(long)]
        host: Option<String>,
    },

    /// Chat with a running relay from the terminal.
    Chat {
        /// Base URL of the relay.
        #[arg(long, default_value = "http://localhost:5000")]
        server: String,

        /// Session identifier (default: a fresh one per run).
        #[arg(long)]
        session: Option<String>,

        /// Print the reply text as-is instead of formatted HTML.
        #[arg(long)]
        plain: bool,

        /// Delay between revealed characters, in milliseconds.
        #[arg(long, default_value_t = 30)]
        delay_ms: u64,
    },

    /// Convert markdown to the relay's HTML format.
    Format {
        /// Markdown file to read (stdin when omitted).
        file: Option<PathBuf>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
