//! CLI definitions for stepgate.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// stepgate CLI.
#[derive(Parser, Debug)]
#[command(name = "stepgate")]
#[command(about = "Human approval gate for suspended Step Functions executions")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "stepgate.toml",
        env = "STEPGATE_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub(crate) enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Server host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config)
        #[arg(long)]
        port: Option<u16>,

        /// Use an in-memory engine and channel instead of AWS and Slack
        #[arg(long)]
        dry_run: bool,
    },

    /// Send one approval request for a suspended execution
    Notify {
        /// Event JSON file, or `-` for stdin
        #[arg(long, default_value = "-")]
        event: String,

        /// Log the message instead of posting it to Slack
        #[arg(long)]
        dry_run: bool,
    },

    /// Load and validate the configuration
    CheckConfig,
}
