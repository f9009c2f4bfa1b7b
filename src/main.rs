use anyhow::{Context, Result};
use bizctl::config::Config;
use clap::Parser;
use log::{debug, info};

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // The terminal belongs to the TUI, so logs go to a file (truncated each run)
    let log_path = Config::log_path()?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {:?}", log_path))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded environment from {:?}", path);
    }

    let cli = Cli::parse();
    info!("Starting bizctl");

    let config = Config::load()?;

    match cli.command {
        Commands::Proposals(args) => {
            cli::commands::proposals_command(args, config).await?;
        }
        Commands::Settings => {
            cli::commands::settings_command(config).await?;
        }
        Commands::Config(args) => {
            cli::commands::config_command(args, &config)?;
        }
    }

    info!("bizctl finished");
    Ok(())
}
