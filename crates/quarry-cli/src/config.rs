//! Configuration management for the CLI.
//!
//! Resolution order: built-in defaults, then the TOML file (`--config`, else
//! `./quarry.toml`, else the user config directory), then environment
//! variables.

use crate::error::{CliError, Result};
use quarry_expander::ExpansionConfig;
use quarry_llm::GeminiProvider;
use quarry_verifier::VerifierConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration file name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "quarry.toml";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Global settings
    pub settings: Settings,

    /// Query expansion pipeline
    pub expansion: ExpansionConfig,

    /// Position verification
    pub verification: VerifierConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Per-user configuration file path.
    pub fn user_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| CliError::Config("Could not find config directory".into()))?;
        Ok(dir.join("quarry").join("config.toml"))
    }

    /// The file that would be read when no explicit path is given, if any exists.
    pub fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        Self::user_path().ok().filter(|p| p.exists())
    }

    /// Load configuration from file and environment.
    ///
    /// An explicit path must exist; discovered files are optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from(path)?,
            None => match Self::discover() {
                Some(found) => Self::load_from(&found)?,
                None => Self::default(),
            },
        };

        let config = config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Override settings with environment values found through `lookup`.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.expansion = self.expansion.apply_lookup(lookup)?;
        Ok(self)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.expansion.validate()?;
        self.verification.validate()?;
        Ok(())
    }

    /// Serialize to TOML (the API key is never written).
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Save configuration to file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// The LLM client shared by quick understanding and verification.
    pub fn llm_provider(&self) -> GeminiProvider {
        let provider = GeminiProvider::new(
            self.expansion.api_key().map(str::to_string),
            self.expansion.llm_model.clone(),
        );
        match self.expansion.llm_base_url.as_deref() {
            Some(base_url) => provider.with_base_url(base_url),
            None => provider,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
