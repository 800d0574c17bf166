//! Expansion results and the metadata describing which tier produced them

use crate::query::ExpandedQuery;
use serde::{Deserialize, Serialize};

/// Which expansion tier produced the final term set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpansionMethod {
    /// Remote workflow or quick AI analysis
    Ai,

    /// Local pattern rules and synonyms
    Local,

    /// No expansion (empty query or fallback disabled)
    None,
}

impl ExpansionMethod {
    /// Get the method name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpansionMethod::Ai => "ai",
            ExpansionMethod::Local => "local",
            ExpansionMethod::None => "none",
        }
    }
}

/// Describes how an expansion was produced, for caller transparency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionMetadata {
    /// Tier that produced the result
    pub method: ExpansionMethod,

    /// Human-readable description of the tier
    pub description: String,
}

impl ExpansionMetadata {
    /// Create metadata for a method with a description
    pub fn new(method: ExpansionMethod, description: impl Into<String>) -> Self {
        Self {
            method,
            description: description.into(),
        }
    }

    /// Metadata for "no expansion happened"
    pub fn none() -> Self {
        Self::new(ExpansionMethod::None, "")
    }
}

/// Outcome of a full expansion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionResult {
    /// Deduplicated, lowercase search terms
    pub terms: Vec<String>,

    /// Expanded variants, when a tier produced any
    pub expanded_queries: Option<Vec<ExpandedQuery>>,

    /// Which tier produced the result
    #[serde(rename = "expansionMeta")]
    pub meta: ExpansionMetadata,
}

impl ExpansionResult {
    /// The result for an empty query
    pub fn empty() -> Self {
        Self {
            terms: Vec::new(),
            expanded_queries: None,
            meta: ExpansionMetadata::none(),
        }
    }
}
