//! Provider capabilities for the expansion tiers
//!
//! Every tier that leaves the process sits behind one of these traits so the
//! orchestrator can walk a chain of them without knowing what they talk to.
//! Failures are values: a provider never panics and never makes the caller
//! wait past its own timeout.

use crate::types::QueryUnderstanding;
use async_trait::async_trait;
use quarry_domain::ExpandedQuery;
use std::time::Duration;
use thiserror::Error;

/// Why a provider produced nothing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Tier disabled by configuration or by the query itself
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// Call exceeded its time budget
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Network-level failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Upstream answered with a non-success status
    #[error("HTTP status {0}")]
    Status(u16),

    /// Upstream answered with an empty body or an empty result
    #[error("Empty response")]
    EmptyResponse,

    /// Upstream answered with something that does not fit the contract
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Whether the provider was skipped rather than attempted
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ProviderError::Unavailable(_))
    }
}

/// A tier that expands a query into role/priority-tagged variants
#[async_trait]
pub trait ExpansionProvider: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Whether the provider is configured to be attempted at all
    fn is_available(&self) -> bool;

    /// Expand a normalized query
    async fn expand(&self, query: &str) -> Result<Vec<ExpandedQuery>, ProviderError>;
}

/// A tier that extracts intent, concepts and synonyms from a query
#[async_trait]
pub trait UnderstandingProvider: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Whether the provider is configured to be attempted at all
    fn is_available(&self) -> bool;

    /// Analyze a normalized query
    async fn understand(&self, query: &str) -> Result<QueryUnderstanding, ProviderError>;
}

/// Cut a response body down to a loggable snippet
pub(crate) fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() <= MAX {
        body.to_string()
    } else {
        let cut: String = body.chars().take(MAX).collect();
        format!("{}...", cut)
    }
}
