//! Configuration for the expansion pipeline
//!
//! Built once at process start and shared by reference with every provider.
//! Each field's effect:
//!
//! | Field | Effect |
//! |-------|--------|
//! | `remote_url` | Production webhook; absent disables the remote tier |
//! | `remote_test_url` | Test webhook; takes precedence over `remote_url` |
//! | `timeout_ms` | Upper bound on the webhook call |
//! | `enable_fallback` | When false, a remote failure skips the local and quick-AI tiers |
//! | `llm_api_key` | Key for the quick understanding call; absent disables that tier |
//! | `understanding_timeout_ms` | Upper bound on the quick understanding call |
//! | `understanding_min_query_chars` | Shorter queries never reach the quick understanding call |
//! | `llm_model` / `llm_base_url` | Model and endpoint for the quick understanding call |

use crate::error::ExpanderError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Environment variable for the production webhook URL
pub const ENV_WEBHOOK_URL: &str = "QUARRY_EXPANSION_WEBHOOK_URL";

/// Environment variable for the test webhook URL
pub const ENV_WEBHOOK_TEST_URL: &str = "QUARRY_EXPANSION_WEBHOOK_TEST_URL";

/// Environment variable for the webhook timeout in milliseconds
pub const ENV_TIMEOUT_MS: &str = "QUARRY_EXPANSION_TIMEOUT_MS";

/// Environment variable toggling the local/quick-AI fallback tiers
pub const ENV_ENABLE_FALLBACK: &str = "QUARRY_EXPANSION_FALLBACK";

/// Environment variable for the LLM API key
pub const ENV_LLM_API_KEY: &str = "GEMINI_API_KEY";

/// Environment variable for the LLM model
pub const ENV_LLM_MODEL: &str = "QUARRY_LLM_MODEL";

/// Environment variable for the LLM base URL
pub const ENV_LLM_BASE_URL: &str = "QUARRY_LLM_BASE_URL";

/// Default webhook timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Default quick understanding timeout
pub const DEFAULT_UNDERSTANDING_TIMEOUT_MS: u64 = 3_000;

/// Queries shorter than this never reach the quick understanding call
pub const DEFAULT_UNDERSTANDING_MIN_QUERY_CHARS: usize = 5;

/// Configuration for the expansion pipeline
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Production webhook URL
    pub remote_url: Option<String>,

    /// Test webhook URL (takes precedence)
    pub remote_test_url: Option<String>,

    /// Webhook timeout (milliseconds)
    pub timeout_ms: u64,

    /// Run the local and quick-AI tiers when the remote tier fails
    pub enable_fallback: bool,

    /// API key for the quick understanding call
    #[serde(skip_serializing)]
    pub llm_api_key: Option<String>,

    /// Quick understanding timeout (milliseconds)
    pub understanding_timeout_ms: u64,

    /// Minimum normalized query length for the quick understanding call
    pub understanding_min_query_chars: usize,

    /// Model used for the quick understanding call
    pub llm_model: String,

    /// Base URL override for the LLM API
    pub llm_base_url: Option<String>,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            remote_url: None,
            remote_test_url: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            enable_fallback: true,
            llm_api_key: None,
            understanding_timeout_ms: DEFAULT_UNDERSTANDING_TIMEOUT_MS,
            understanding_min_query_chars: DEFAULT_UNDERSTANDING_MIN_QUERY_CHARS,
            llm_model: quarry_llm::gemini::DEFAULT_MODEL.to_string(),
            llm_base_url: None,
        }
    }
}

// The API key must never end up in logs.
impl fmt::Debug for ExpansionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpansionConfig")
            .field("remote_url", &self.remote_url)
            .field("remote_test_url", &self.remote_test_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("enable_fallback", &self.enable_fallback)
            .field("llm_api_key", &self.llm_api_key.as_ref().map(|_| "<redacted>"))
            .field("understanding_timeout_ms", &self.understanding_timeout_ms)
            .field("understanding_min_query_chars", &self.understanding_min_query_chars)
            .field("llm_model", &self.llm_model)
            .field("llm_base_url", &self.llm_base_url)
            .finish()
    }
}

impl ExpansionConfig {
    /// Effective webhook URL; the test URL wins when both are set
    pub fn webhook_url(&self) -> Option<&str> {
        non_blank(self.remote_test_url.as_deref()).or_else(|| non_blank(self.remote_url.as_deref()))
    }

    /// Effective LLM API key, if any
    pub fn api_key(&self) -> Option<&str> {
        non_blank(self.llm_api_key.as_deref())
    }

    /// Get the webhook timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get the quick understanding timeout as a Duration
    pub fn understanding_timeout(&self) -> Duration {
        Duration::from_millis(self.understanding_timeout_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExpanderError> {
        if self.timeout_ms == 0 {
            return Err(ExpanderError::Config("timeout_ms must be greater than 0".to_string()));
        }
        if self.understanding_timeout_ms == 0 {
            return Err(ExpanderError::Config(
                "understanding_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.llm_model.trim().is_empty() {
            return Err(ExpanderError::Config("llm_model must not be empty".to_string()));
        }
        if let Some(url) = self.webhook_url() {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ExpanderError::Config(format!("webhook URL must be http(s): {}", url)));
            }
        }
        Ok(())
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ExpanderError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup, on top of defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ExpanderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().apply_lookup(lookup)
    }

    /// Override fields with values found through `lookup`
    ///
    /// Missing keys leave the current value alone. Present but unparseable
    /// numbers or booleans are errors.
    pub fn apply_lookup<F>(mut self, lookup: F) -> Result<Self, ExpanderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_WEBHOOK_URL) {
            self.remote_url = Some(url);
        }
        if let Some(url) = lookup(ENV_WEBHOOK_TEST_URL) {
            self.remote_test_url = Some(url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            self.timeout_ms = raw.trim().parse().map_err(|_| {
                ExpanderError::Config(format!("{} must be an integer, got '{}'", ENV_TIMEOUT_MS, raw))
            })?;
        }
        if let Some(raw) = lookup(ENV_ENABLE_FALLBACK) {
            self.enable_fallback = parse_bool(&raw).ok_or_else(|| {
                ExpanderError::Config(format!("{} must be a boolean, got '{}'", ENV_ENABLE_FALLBACK, raw))
            })?;
        }
        if let Some(key) = lookup(ENV_LLM_API_KEY) {
            self.llm_api_key = Some(key);
        }
        if let Some(model) = lookup(ENV_LLM_MODEL) {
            self.llm_model = model;
        }
        if let Some(base) = lookup(ENV_LLM_BASE_URL) {
            self.llm_base_url = Some(base);
        }
        Ok(self)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ExpansionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_millis(5000));
        assert_eq!(config.understanding_timeout(), Duration::from_millis(3000));
        assert!(config.enable_fallback);
        assert!(config.webhook_url().is_none());
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_test_url_takes_precedence() {
        let mut config = ExpansionConfig::default();
        config.remote_url = Some("https://prod.example/hook".to_string());
        assert_eq!(config.webhook_url(), Some("https://prod.example/hook"));

        config.remote_test_url = Some("https://test.example/hook".to_string());
        assert_eq!(config.webhook_url(), Some("https://test.example/hook"));

        config.remote_test_url = Some("   ".to_string());
        assert_eq!(config.webhook_url(), Some("https://prod.example/hook"));
    }

    #[test]
    fn test_from_lookup() {
        let config = ExpansionConfig::from_lookup(lookup_from(&[
            (ENV_WEBHOOK_URL, "https://prod.example/hook"),
            (ENV_TIMEOUT_MS, "2500"),
            (ENV_ENABLE_FALLBACK, "off"),
            (ENV_LLM_API_KEY, "k"),
        ]))
        .unwrap();

        assert_eq!(config.webhook_url(), Some("https://prod.example/hook"));
        assert_eq!(config.timeout_ms, 2500);
        assert!(!config.enable_fallback);
        assert_eq!(config.api_key(), Some("k"));
    }

    #[test]
    fn test_from_lookup_rejects_bad_numbers() {
        let result = ExpansionConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT_MS, "soon")]));
        assert!(matches!(result, Err(ExpanderError::Config(_))));

        let result = ExpansionConfig::from_lookup(lookup_from(&[(ENV_ENABLE_FALLBACK, "maybe")]));
        assert!(matches!(result, Err(ExpanderError::Config(_))));
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = ExpansionConfig::default();
        config.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_webhook_scheme() {
        let mut config = ExpansionConfig::default();
        config.remote_url = Some("ftp://example/hook".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut config = ExpansionConfig::default();
        config.llm_api_key = Some("secret".to_string());
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
