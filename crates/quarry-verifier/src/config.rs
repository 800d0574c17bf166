//! Configuration for the Verifier

use crate::error::VerifierError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Verifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Maximum sources included in the prompt (newest first)
    pub max_sources: usize,

    /// Maximum time for the AI call (seconds)
    pub timeout_secs: u64,

    /// Output budget for the AI call
    pub max_output_tokens: u32,

    /// Sampling temperature for the AI call
    pub temperature: f32,

    /// Newest source older than this many years skips the AI call entirely
    pub stale_after_years: i32,
}

impl VerifierConfig {
    /// Get the AI call timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), VerifierError> {
        if self.max_sources == 0 {
            return Err(VerifierError::Config("max_sources must be greater than 0".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(VerifierError::Config("timeout_secs must be greater than 0".to_string()));
        }
        if self.max_output_tokens == 0 {
            return Err(VerifierError::Config(
                "max_output_tokens must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(VerifierError::Config(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }
        if self.stale_after_years < 0 {
            return Err(VerifierError::Config(
                "stale_after_years must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            max_sources: 15,
            timeout_secs: 30,
            max_output_tokens: 1024,
            temperature: 0.2,
            stale_after_years: 3,
        }
    }
}
