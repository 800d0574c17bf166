//! Expansion orchestrator
//!
//! Walks the tiers richest-first and always returns a best-effort result:
//!
//! ```text
//! remote chain ──ok──▶ ai
//!      │ fail
//!      ▼
//! local rules + synonyms ──coverage good──▶ local
//!      │ thin
//!      ▼
//! quick understanding ──ok──▶ ai   (fail: keep local)
//! ```

use crate::config::ExpansionConfig;
use crate::filter::{meaningful_words, tokenize};
use crate::provider::{ExpansionProvider, UnderstandingProvider};
use crate::semantic::{expand_semantics, expand_with_synonyms};
use crate::terms::{extract_search_terms, TermSet};
use crate::types::{QueryUnderstanding, SearchInput};
use crate::understanding::QuickUnderstandingProvider;
use crate::webhook::WebhookExpansionProvider;
use futures::future::join_all;
use quarry_domain::{
    normalize_query, ExpandedQuery, ExpansionMetadata, ExpansionMethod, ExpansionResult, QueryRole,
};
use quarry_llm::LlmProvider;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Semantic phrase count at which local coverage counts as good
const MIN_SEMANTIC_PHRASES: usize = 2;

/// Synonym count at which local coverage counts as good
const MIN_SYNONYMS: usize = 3;

/// Priority of the first quick-understanding concept; later ones step down to 1
const CONCEPT_TOP_PRIORITY: i32 = 8;

/// Tiered query expander
pub struct Expander {
    remote: Vec<Arc<dyn ExpansionProvider>>,
    understanding: Option<Arc<dyn UnderstandingProvider>>,
    config: ExpansionConfig,
}

impl Expander {
    /// Create an expander with no remote or AI providers (local tier only)
    pub fn new(config: ExpansionConfig) -> Self {
        Self {
            remote: Vec::new(),
            understanding: None,
            config,
        }
    }

    /// Create an expander wired to the configured webhook, with quick
    /// understanding running on `llm`
    ///
    /// A missing URL, or an unavailable `llm`, leaves that tier unavailable.
    pub fn from_config(config: ExpansionConfig, llm: Arc<dyn LlmProvider>) -> Self {
        let webhook = WebhookExpansionProvider::from_config(&config);
        let understanding = QuickUnderstandingProvider::from_config(llm, &config);

        Self::new(config)
            .with_remote_provider(Arc::new(webhook))
            .with_understanding_provider(Arc::new(understanding))
    }

    /// Append a provider to the remote chain
    pub fn with_remote_provider(mut self, provider: Arc<dyn ExpansionProvider>) -> Self {
        self.remote.push(provider);
        self
    }

    /// Set the quick-understanding provider
    pub fn with_understanding_provider(mut self, provider: Arc<dyn UnderstandingProvider>) -> Self {
        self.understanding = Some(provider);
        self
    }

    /// Expand a raw query into search terms with metadata
    pub async fn expand_for_search(&self, query: &str) -> ExpansionResult {
        let query = normalize_query(query);
        if query.is_empty() {
            return ExpansionResult::empty();
        }

        let original = meaningful_words(&query);
        let synonyms = expand_with_synonyms(&query);

        if let Some(remote) = self.try_remote(&query).await {
            let mut terms = TermSet::new();
            terms.extend(extract_search_terms(&remote));
            terms.extend(&original);
            terms.extend_filtered(&synonyms);

            info!(query = %query, terms = terms.len(), "Expanded via remote provider");
            return ExpansionResult {
                terms: terms.into_vec(),
                expanded_queries: Some(remote),
                meta: ExpansionMetadata::new(ExpansionMethod::Ai, "AI-powered expansion"),
            };
        }

        if !self.config.enable_fallback {
            let mut terms = TermSet::new();
            terms.extend(&original);
            terms.extend_filtered(&synonyms);

            info!(query = %query, "Remote expansion failed and fallback is disabled");
            return ExpansionResult {
                terms: terms.into_vec(),
                expanded_queries: None,
                meta: ExpansionMetadata::new(ExpansionMethod::None, "Expansion unavailable"),
            };
        }

        let semantic = expand_semantics(&query);
        let mut terms = TermSet::new();
        terms.extend_words(&semantic);
        terms.extend(&original);
        terms.extend_filtered(&synonyms);

        let coverage_good = semantic.len() >= MIN_SEMANTIC_PHRASES || synonyms.len() >= MIN_SYNONYMS;
        let local = ExpansionResult {
            terms: Vec::new(),
            expanded_queries: None,
            meta: ExpansionMetadata::new(
                ExpansionMethod::Local,
                local_description(!semantic.is_empty(), !synonyms.is_empty()),
            ),
        };

        if coverage_good {
            info!(
                query = %query,
                semantic = semantic.len(),
                synonyms = synonyms.len(),
                "Expanded locally"
            );
            return ExpansionResult {
                terms: terms.into_vec(),
                ..local
            };
        }

        debug!(
            query = %query,
            semantic = semantic.len(),
            synonyms = synonyms.len(),
            "Local coverage thin, trying quick understanding"
        );

        match self.try_understanding(&query).await {
            Some(understanding) => {
                terms.extend_filtered(&understanding.concepts);
                terms.extend_filtered(&understanding.synonyms);

                info!(query = %query, intent = %understanding.intent, "Expanded via quick understanding");
                ExpansionResult {
                    terms: terms.into_vec(),
                    expanded_queries: Some(concept_queries(&understanding.concepts)),
                    meta: ExpansionMetadata::new(ExpansionMethod::Ai, "Enhanced with quick AI analysis"),
                }
            }
            None => ExpansionResult {
                terms: terms.into_vec(),
                ..local
            },
        }
    }

    /// Alias of [`Expander::expand_for_search`]
    pub async fn expand_search_terms_with_queries(&self, query: &str) -> ExpansionResult {
        self.expand_for_search(query).await
    }

    /// Remote tier only: expanded queries sorted by priority, or `None`
    pub async fn expand_query(&self, query: &str) -> Option<Vec<ExpandedQuery>> {
        let query = normalize_query(query);
        if query.is_empty() {
            return None;
        }
        self.try_remote(&query).await
    }

    /// Flat search terms for a query or for a body of work
    ///
    /// List entries are expanded concurrently; their terms are unioned in
    /// input order.
    pub async fn expand_search_terms(&self, input: impl Into<SearchInput>) -> Vec<String> {
        let queries = input.into().into_queries();
        let results = join_all(queries.iter().map(|q| self.expand_for_search(q))).await;

        let mut terms = TermSet::new();
        for result in results {
            terms.extend(result.terms);
        }
        terms.into_vec()
    }

    async fn try_remote(&self, query: &str) -> Option<Vec<ExpandedQuery>> {
        for provider in &self.remote {
            if !provider.is_available() {
                debug!(provider = provider.name(), "Remote provider unavailable, skipping");
                continue;
            }

            match provider.expand(query).await {
                Ok(mut queries) if !queries.is_empty() => {
                    ExpandedQuery::sort_by_priority(&mut queries);
                    debug!(provider = provider.name(), count = queries.len(), "Remote expansion succeeded");
                    return Some(queries);
                }
                Ok(_) => debug!(provider = provider.name(), "Remote provider returned no queries"),
                Err(e) if e.is_unavailable() => debug!(provider = provider.name(), "Skipped: {}", e),
                Err(e) => warn!(provider = provider.name(), "Remote expansion failed: {}", e),
            }
        }
        None
    }

    async fn try_understanding(&self, query: &str) -> Option<QueryUnderstanding> {
        let provider = self.understanding.as_ref()?;
        if !provider.is_available() {
            debug!(provider = provider.name(), "Understanding provider unavailable, skipping");
            return None;
        }

        match provider.understand(query).await {
            Ok(understanding) => Some(understanding),
            Err(e) if e.is_unavailable() => {
                debug!(provider = provider.name(), "Skipped: {}", e);
                None
            }
            Err(e) => {
                warn!(provider = provider.name(), "Quick understanding failed: {}", e);
                None
            }
        }
    }
}

fn local_description(semantic: bool, synonyms: bool) -> &'static str {
    match (semantic, synonyms) {
        (true, true) => "Local expansion via pattern matching and synonym expansion",
        (true, false) => "Local expansion via pattern matching",
        (false, true) => "Local expansion via synonym expansion",
        (false, false) => "Keyword matching only",
    }
}

fn concept_queries(concepts: &[String]) -> Vec<ExpandedQuery> {
    concepts
        .iter()
        .enumerate()
        .map(|(idx, concept)| {
            let priority = (CONCEPT_TOP_PRIORITY - idx as i32).max(1);
            ExpandedQuery::new(tokenize(concept).join(" "), QueryRole::LlmConcept, priority)
        })
        .filter(|q| !q.query.is_empty())
        .collect()
}
