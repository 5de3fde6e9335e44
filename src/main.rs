//! stepgate - human approval gate for Step Functions
//!
//! Main entry point for the stepgate CLI and server.

mod cli;
mod cmd_config;
mod cmd_notify;
mod server;

use clap::Parser;

use stepgate_config::ConfigLoader;

use cli::{Cli, Commands};
use cmd_config::handle_check_config;
use cmd_notify::handle_notify_command;
use server::{init_tracing, run_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logging settings live in the config, so load it first.
    let config = ConfigLoader::load_or_default(&cli.config)?;

    match cli.command {
        Some(Commands::CheckConfig) => handle_check_config(&cli.config, &config),
        Some(Commands::Notify { event, dry_run }) => {
            init_tracing(&config.logging)?;
            handle_notify_command(&config, &event, dry_run).await
        }
        Some(Commands::Serve {
            host,
            port,
            dry_run,
        }) => {
            init_tracing(&config.logging)?;
            run_server(config, host, port, dry_run).await
        }
        None => {
            init_tracing(&config.logging)?;
            run_server(config, None, None, false).await
        }
    }
}
