//! Quarry CLI - Extract convention-encoded XML game data to structured JSON.

use clap::Parser;
use quarry_cli::commands;
use quarry_cli::config::{load_registry, Config};
use quarry_cli::{Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> quarry_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing (log to stderr, RUST_LOG wins over -v)
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let config = Config::load(cli.config.as_deref())?;
    let registry = load_registry(cli.registry.as_deref())?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Extract(args) => {
            commands::execute_extract(args, &config, &registry, &formatter).await?;
        }
        Command::Resolve(args) => {
            commands::execute_resolve(args, &config, &formatter)?;
        }
        Command::Categories => {
            commands::execute_categories(&registry, &formatter)?;
        }
    }

    Ok(())
}
