//! Quarry Domain Layer
//!
//! Core value types shared by the expansion and verification pipelines.
//! Nothing in this crate performs I/O; providers, orchestration and
//! configuration live in the other workspace crates.
//!
//! ## Key Concepts
//!
//! - **ExpandedQuery**: A role- and priority-tagged variant of a user query
//! - **ExpansionResult**: The final term set plus which tier produced it
//! - **Source**: A dated (possibly imprecisely) piece of published content
//! - **PositionAnalysis**: The verdict on whether a recorded position still holds
//!
//! ## Architecture
//!
//! - Pure data and small helpers only
//! - Serde derives so values can cross the webhook and CLI boundaries as-is
//! - Tolerant parsing for strings coming from remote services

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod expansion;
pub mod position;
pub mod query;
pub mod source;

// Re-exports for convenience
pub use expansion::{ExpansionMetadata, ExpansionMethod, ExpansionResult};
pub use position::{
    Confidence, PositionAnalysis, PositionVerificationResult, ShiftSeverity, VerificationStatus,
};
pub use query::{normalize_query, ExpandedQuery, QueryRole};
pub use source::{Source, SourceType};
