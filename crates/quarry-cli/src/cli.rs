//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Quarry CLI - Expand search queries and verify recorded positions.
#[derive(Debug, Parser)]
#[command(name = "quarry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "QUARRY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log decisions and provider calls to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (terms or status only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Expand a query into search terms, reporting which tier produced them
    Expand(ExpandArgs),

    /// Flat search terms for one query or several titles
    Terms(TermsArgs),

    /// Check recorded position summaries against newer sources
    Verify(VerifyArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

/// Arguments for the expand command.
#[derive(Debug, Parser)]
pub struct ExpandArgs {
    /// Query words (joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Only ask the remote provider; print its expanded queries or nothing
    #[arg(long)]
    pub remote_only: bool,
}

/// Arguments for the terms command.
#[derive(Debug, Parser)]
pub struct TermsArgs {
    /// One query, or several titles/topics treated as a body of work
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<String>,

    /// Print the multi-word sub-phrases of each input instead (no providers called)
    #[arg(long)]
    pub phrases: bool,
}

/// Arguments for the verify command.
#[derive(Debug, Parser)]
pub struct VerifyArgs {
    /// Recorded position summary
    #[arg(short, long, conflicts_with = "batch")]
    pub summary: Option<String>,

    /// JSON file with an array of sources
    #[arg(long, conflicts_with = "batch")]
    pub sources: Option<PathBuf>,

    /// Camp the entity is filed under (repeatable)
    #[arg(long, conflicts_with = "batch")]
    pub camp: Vec<String>,

    /// JSON file with an array of verification requests
    #[arg(long)]
    pub batch: Option<PathBuf>,

    /// Measure source ages against this year instead of today
    #[arg(long)]
    pub year: Option<i32>,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration (file plus environment)
    Show,

    /// Write a default configuration file
    Init {
        /// Destination (defaults to the --config path or the user config directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expand() {
        let cli = Cli::try_parse_from(["quarry", "-f", "json", "expand", "is", "ai", "a", "bubble"]).unwrap();
        assert_eq!(cli.format, Some(CliFormat::Json));
        match cli.command {
            Command::Expand(args) => {
                assert_eq!(args.query.join(" "), "is ai a bubble");
                assert!(!args.remote_only);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_verify_batch_conflicts_with_summary() {
        let result = Cli::try_parse_from([
            "quarry", "verify", "--summary", "s", "--batch", "requests.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_config_init() {
        let cli = Cli::try_parse_from(["quarry", "--verbose", "config", "init", "out.toml", "--force"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Config(ConfigArgs {
                action: ConfigAction::Init { path, force },
            }) => {
                assert_eq!(path, Some(PathBuf::from("out.toml")));
                assert!(force);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_verify_repeated_camp() {
        let cli = Cli::try_parse_from([
            "quarry", "verify", "--summary", "s", "--camp", "optimist", "--camp", "realist",
        ])
        .unwrap();
        match cli.command {
            Command::Verify(args) => assert_eq!(args.camp, vec!["optimist", "realist"]),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_expand_requires_query() {
        assert!(Cli::try_parse_from(["quarry", "expand"]).is_err());
    }
}
