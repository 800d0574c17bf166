//! Quarry Expander
//!
//! Turns short, under-specified search strings into a richer, prioritized set
//! of related terms.
//!
//! # Overview
//!
//! A user typing "is AI a bubble" is really asking about a debate: realists,
//! skeptics, valuations, hype. The expander surfaces those related terms so
//! downstream search can find content that never uses the literal words.
//!
//! # Architecture
//!
//! ```text
//! query → Expander → remote webhook      (ai)
//!                  → local rules/synonyms (local)
//!                  → quick understanding  (ai, only when local coverage is thin)
//! ```
//!
//! # Key Features
//!
//! - **Graceful degradation**: every tier failure falls through to the next; callers always get a result
//! - **Pluggable providers**: remote and AI tiers sit behind async traits
//! - **Bounded latency**: each outbound call has its own timeout
//! - **Transparency**: results carry which tier produced them
//!
//! # Example Usage
//!
//! ```no_run
//! use quarry_expander::{Expander, ExpansionConfig};
//! use quarry_llm::GeminiProvider;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExpansionConfig::from_env()?;
//! let llm = GeminiProvider::new(config.api_key().map(str::to_string), config.llm_model.clone());
//! let expander = Expander::from_config(config, Arc::new(llm));
//!
//! let result = expander.expand_for_search("is AI a bubble").await;
//! println!("{} via {}", result.terms.join(", "), result.meta.method.as_str());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod expander;
pub mod filter;
pub mod provider;
pub mod semantic;
pub mod terms;
pub mod types;
pub mod understanding;
pub mod webhook;

#[cfg(test)]
mod tests;

pub use config::ExpansionConfig;
pub use error::ExpanderError;
pub use expander::Expander;
pub use filter::{extract_phrases, filter_meaningful, is_stopword, tokenize};
pub use provider::{ExpansionProvider, ProviderError, UnderstandingProvider};
pub use semantic::{expand_semantics, expand_with_synonyms};
pub use terms::{extract_search_terms, TermSet};
pub use types::{QueryUnderstanding, SearchInput};
pub use understanding::QuickUnderstandingProvider;
pub use webhook::WebhookExpansionProvider;
