//! Error types for the verifier

use thiserror::Error;

/// Errors that can occur while configuring the verifier
///
/// Verification itself never fails; every problem becomes a low-confidence
/// result instead.
#[derive(Error, Debug)]
pub enum VerifierError {
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}
