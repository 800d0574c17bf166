//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &Config,
    config_path: Option<&Path>,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(config, config_path, formatter),
        ConfigAction::Init { path, force } => {
            let target = match path.or_else(|| config_path.map(Path::to_path_buf)) {
                Some(p) => p,
                None => Config::user_path()?,
            };
            init_config(&target, force, formatter)
        }
    }
}

/// Print the effective configuration.
fn show_config(config: &Config, config_path: Option<&Path>, formatter: &Formatter) -> Result<()> {
    let source = config_path
        .map(Path::to_path_buf)
        .or_else(Config::discover)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in defaults".to_string());
    println!("{}", formatter.info(&format!("Loaded from {} (plus environment)", source)));

    match config.expansion.webhook_url() {
        Some(url) => println!("{}", formatter.success(&format!("Remote expansion: {}", url))),
        None => println!("{}", formatter.warning("Remote expansion disabled (no webhook URL)")),
    }
    if config.expansion.api_key().is_some() {
        println!("{}", formatter.success(&format!("LLM: {} (API key set)", config.expansion.llm_model)));
    } else {
        println!("{}", formatter.warning("LLM disabled (no API key)"));
    }

    println!();
    println!("{}", config.to_toml()?);
    Ok(())
}

/// Write a default configuration file.
fn init_config(path: &Path, force: bool, formatter: &Formatter) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Config::default().save_to(path)?;
    println!("{}", formatter.success(&format!("Wrote {}", path.display())));
    Ok(())
}
