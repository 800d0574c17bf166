//! Error types for the expander
//!
//! Provider failures never escape the pipeline; they are `ProviderError`
//! values (see `provider.rs`) that the orchestrator turns into "try the next
//! tier". `ExpanderError` covers the only things that can legitimately fail
//! outward: building the configuration.

use thiserror::Error;

/// Errors that can occur while configuring the expander
#[derive(Error, Debug)]
pub enum ExpanderError {
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}
