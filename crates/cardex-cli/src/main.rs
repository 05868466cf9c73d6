//! cardex CLI - trading-card catalog harvesting and fuzzy search
//!
//! Entry point: parses arguments, installs logging, loads configuration and
//! dispatches to the command modules.

use anyhow::{Context, Result};
use cardex_core::Config;
use clap::Parser;

mod cli;
mod commands;
mod output;
mod utils;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    utils::logging::initialize_logging(&cli)?;

    let config = load_config(&cli)?;
    execute_command(cli, config).await
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Config::load().context("loading config"),
    }
}

async fn execute_command(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Acquire { refresh } => commands::acquire(config, refresh, cli.quiet).await,
        Commands::Crawl => commands::crawl(config, cli.quiet).await,
        Commands::Search {
            query,
            multi,
            limit,
            format,
        } => {
            let query = query.join(" ");
            commands::search(config, &query, multi, limit, format, cli.quiet).await
        },
        Commands::ClearCache => commands::clear_cache(&config),
    }
}
