//! Daily stock screener CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use screener_config::load_config;
use screener_monitor::setup_logging;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config));

    // Setup logging
    let logging = loaded.as_ref().map(|config| config.logging.clone()).unwrap_or_default();
    let log_level = cli
        .log_level
        .map(|level| level.as_str().to_string())
        .unwrap_or(logging.level);
    let json = cli.json_logs || logging.format == "json";
    setup_logging(&log_level, json, logging.file.as_deref().map(Path::new));

    // Execute command
    match cli.command {
        Commands::Scan(args) => cli::commands::scan::run(args, loaded?).await,
        Commands::Inspect(args) => cli::commands::inspect::run(args, loaded?).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, loaded).await,
    }
}
