//! Quarry CLI - Query expansion and position verification from the command line.

use clap::Parser;
use quarry_cli::commands;
use quarry_cli::{Cli, Command, Config, Formatter};
use quarry_expander::Expander;
use std::sync::Arc;
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

    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Expand(args) => {
            commands::execute_expand(args, &expander(&config), &formatter).await?;
        }
        Command::Terms(args) => {
            commands::execute_terms(args, &expander(&config), &formatter).await?;
        }
        Command::Verify(args) => {
            commands::execute_verify(args, &config, &formatter).await?;
        }
        Command::Config(args) => {
            commands::execute_config(args, &config, cli.config.as_deref(), &formatter)?;
        }
    }

    Ok(())
}

fn expander(config: &Config) -> Expander {
    Expander::from_config(config.expansion.clone(), Arc::new(config.llm_provider()))
}

/// Log to stderr so command output on stdout stays machine-readable
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
