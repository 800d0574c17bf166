//! Quarry Verifier
//!
//! Checks whether a recorded summary of an entity's position still matches
//! newer published sources, and calibrates the AI-reported confidence against
//! how recent those sources are.
//!
//! # Architecture
//!
//! ```text
//! summary + sources → recency check ──stale/undated──▶ low confidence, no AI call
//!                          │
//!                          ▼
//!                    LLM analysis → parse → age-based confidence cap → status
//! ```
//!
//! Status is `drift_detected` for a moderate or significant shift,
//! `needs_review` when unaligned or low-confidence, and `verified` otherwise.
//!
//! # Example Usage
//!
//! ```no_run
//! use quarry_domain::{Source, SourceType};
//! use quarry_llm::GeminiProvider;
//! use quarry_verifier::{Verifier, VerifierConfig};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let llm = GeminiProvider::new(std::env::var("GEMINI_API_KEY").ok(), "gemini-2.0-flash");
//! let verifier = Verifier::new(Arc::new(llm), VerifierConfig::default());
//!
//! let sources = vec![Source::new("Keynote", SourceType::Talk).with_date("2025-04-02")];
//! let camps = vec!["accelerationist".to_string()];
//! let result = verifier
//!     .verify("Expects scaling to continue for a decade.", &sources, &camps)
//!     .await;
//! println!("{} ({})", result.status.as_str(), result.analysis.confidence.as_str());
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod parser;
pub mod prompt;
pub mod staleness;
pub mod verifier;


pub use config::VerifierConfig;
pub use error::VerifierError;
pub use staleness::{apply_confidence_override, Recency};
pub use verifier::{VerificationRequest, Verifier};
