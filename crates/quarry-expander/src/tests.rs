//! Integration tests for the Expander

#[cfg(test)]
mod tests {
    use crate::{
        Expander, ExpansionConfig, ExpansionProvider, ProviderError, QueryUnderstanding,
        SearchInput, UnderstandingProvider,
    };
    use async_trait::async_trait;
    use proptest::prelude::*;
    use quarry_domain::{ExpandedQuery, ExpansionMethod, QueryRole};
    use quarry_llm::MockProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Remote provider with a canned outcome
    struct StubRemote {
        available: bool,
        outcome: Result<Vec<ExpandedQuery>, ProviderError>,
        calls: AtomicUsize,
    }

    impl StubRemote {
        fn ok(queries: Vec<ExpandedQuery>) -> Arc<Self> {
            Arc::new(Self {
                available: true,
                outcome: Ok(queries),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(error: ProviderError) -> Arc<Self> {
            Arc::new(Self {
                available: true,
                outcome: Err(error),
                calls: AtomicUsize::new(0),
            })
        }

        fn unavailable() -> Arc<Self> {
            Arc::new(Self {
                available: false,
                outcome: Err(ProviderError::Unavailable("no url".to_string())),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExpansionProvider for StubRemote {
        fn name(&self) -> &str {
            "stub-remote"
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn expand(&self, _query: &str) -> Result<Vec<ExpandedQuery>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    /// Understanding provider with a canned outcome
    struct StubUnderstanding {
        available: bool,
        outcome: Result<QueryUnderstanding, ProviderError>,
        calls: AtomicUsize,
    }

    impl StubUnderstanding {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                available: true,
                outcome: Ok(QueryUnderstanding {
                    intent: "how to bake sourdough".to_string(),
                    concepts: vec!["Fermentation".to_string(), "baking".to_string(), "ok".to_string()],
                    synonyms: vec!["bread starter".to_string()],
                }),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                available: true,
                outcome: Err(ProviderError::Timeout(Duration::from_millis(3000))),
                calls: AtomicUsize::new(0),
            })
        }

        fn unavailable() -> Arc<Self> {
            Arc::new(Self {
                available: false,
                outcome: Err(ProviderError::Unavailable("no key".to_string())),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UnderstandingProvider for StubUnderstanding {
        fn name(&self) -> &str {
            "stub-understanding"
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn understand(&self, _query: &str) -> Result<QueryUnderstanding, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn machine_learning() -> Vec<ExpandedQuery> {
        vec![ExpandedQuery::new("machine learning", QueryRole::Context, 8)]
    }

    const THIN_QUERY: &str = "sourdough starter tips";

    #[tokio::test]
    async fn test_local_expansion_when_remote_unavailable() {
        let remote = StubRemote::unavailable();
        let understanding = StubUnderstanding::ok();
        let expander = Expander::new(ExpansionConfig::default())
            .with_remote_provider(remote.clone())
            .with_understanding_provider(understanding.clone());

        let result = expander.expand_for_search("is AI a bubble").await;

        assert_eq!(result.meta.method, ExpansionMethod::Local);
        assert_eq!(
            result.meta.description,
            "Local expansion via pattern matching and synonym expansion"
        );
        for term in ["realist", "skeptic", "grounding", "limitation", "critical", "bubble"] {
            assert!(result.terms.contains(&term.to_string()), "missing {}", term);
        }
        assert!(!result.terms.contains(&"is".to_string()));
        assert!(result.expanded_queries.is_none());
        assert_eq!(remote.calls(), 0);
        assert_eq!(understanding.calls(), 0, "coverage was good, no AI call expected");
    }

    #[tokio::test]
    async fn test_empty_query_short_circuits() {
        let remote = StubRemote::ok(machine_learning());
        let expander = Expander::new(ExpansionConfig::default()).with_remote_provider(remote.clone());

        for query in ["", "   \t  "] {
            let result = expander.expand_for_search(query).await;
            assert!(result.terms.is_empty());
            assert!(result.expanded_queries.is_none());
            assert_eq!(result.meta.method, ExpansionMethod::None);
            assert_eq!(result.meta.description, "");
        }
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn test_remote_success() {
        let expander = Expander::new(ExpansionConfig::default())
            .with_remote_provider(StubRemote::ok(machine_learning()));

        let result = expander.expand_for_search("is AI a bubble").await;

        assert_eq!(result.meta.method, ExpansionMethod::Ai);
        assert_eq!(result.meta.description, "AI-powered expansion");
        for term in ["machine", "learning", "machine learning", "bubble"] {
            assert!(result.terms.contains(&term.to_string()), "missing {}", term);
        }
        assert_eq!(result.expanded_queries, Some(machine_learning()));
    }

    #[tokio::test]
    async fn test_remote_timeout_falls_through_to_local() {
        let expander = Expander::new(ExpansionConfig::default()).with_remote_provider(
            StubRemote::failing(ProviderError::Timeout(Duration::from_millis(5000))),
        );

        let result = expander.expand_for_search("is AI a bubble").await;
        assert_eq!(result.meta.method, ExpansionMethod::Local);
        assert!(result.terms.contains(&"skeptic".to_string()));
    }

    #[tokio::test]
    async fn test_remote_queries_sorted_by_priority() {
        let expander = Expander::new(ExpansionConfig::default()).with_remote_provider(StubRemote::ok(vec![
            ExpandedQuery::new("low", QueryRole::Related, 2),
            ExpandedQuery::new("high", QueryRole::Core, 10),
            ExpandedQuery::new("mid", QueryRole::Context, 6),
        ]));

        let queries = expander.expand_query("anything at all").await.unwrap();
        let priorities: Vec<i32> = queries.iter().map(|q| q.priority).collect();
        assert_eq!(priorities, vec![10, 6, 2]);
    }

    #[tokio::test]
    async fn test_expand_query_none_on_failure() {
        let expander = Expander::new(ExpansionConfig::default())
            .with_remote_provider(StubRemote::failing(ProviderError::Status(500)));
        assert!(expander.expand_query("is ai a bubble").await.is_none());
        assert!(expander.expand_query("  ").await.is_none());
    }

    #[tokio::test]
    async fn test_chain_moves_past_empty_and_failed_providers() {
        let empty = StubRemote::ok(Vec::new());
        let broken = StubRemote::failing(ProviderError::MalformedResponse("bad".to_string()));
        let good = StubRemote::ok(machine_learning());
        let expander = Expander::new(ExpansionConfig::default())
            .with_remote_provider(empty.clone())
            .with_remote_provider(broken.clone())
            .with_remote_provider(good.clone());

        let result = expander.expand_for_search("is ai a bubble").await;
        assert_eq!(result.meta.method, ExpansionMethod::Ai);
        assert_eq!((empty.calls(), broken.calls(), good.calls()), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_thin_coverage_uses_quick_understanding() {
        let understanding = StubUnderstanding::ok();
        let expander = Expander::new(ExpansionConfig::default())
            .with_remote_provider(StubRemote::unavailable())
            .with_understanding_provider(understanding.clone());

        let result = expander.expand_for_search(THIN_QUERY).await;

        assert_eq!(result.meta.method, ExpansionMethod::Ai);
        assert_eq!(result.meta.description, "Enhanced with quick AI analysis");
        for term in ["sourdough", "starter", "tips", "fermentation", "baking", "bread starter"] {
            assert!(result.terms.contains(&term.to_string()), "missing {}", term);
        }
        assert!(!result.terms.contains(&"ok".to_string()));

        let queries = result.expanded_queries.unwrap();
        assert_eq!(queries[0].query, "fermentation");
        assert_eq!(queries[0].role, QueryRole::LlmConcept);
        assert_eq!(queries[0].priority, 8);
        assert_eq!(queries[1].priority, 7);
        assert_eq!(understanding.calls(), 1);
    }

    #[tokio::test]
    async fn test_thin_coverage_understanding_failure_keeps_local() {
        let expander = Expander::new(ExpansionConfig::default())
            .with_understanding_provider(StubUnderstanding::failing());

        let result = expander.expand_for_search(THIN_QUERY).await;
        assert_eq!(result.meta.method, ExpansionMethod::Local);
        assert_eq!(result.meta.description, "Keyword matching only");
        assert_eq!(result.terms, vec!["sourdough", "starter", "tips"]);
    }

    #[tokio::test]
    async fn test_fallback_disabled() {
        let understanding = StubUnderstanding::ok();
        let config = ExpansionConfig {
            enable_fallback: false,
            ..ExpansionConfig::default()
        };
        let expander = Expander::new(config)
            .with_remote_provider(StubRemote::failing(ProviderError::Status(503)))
            .with_understanding_provider(understanding.clone());

        let result = expander.expand_for_search("is AI a bubble").await;
        assert_eq!(result.meta.method, ExpansionMethod::None);
        assert_eq!(result.meta.description, "Expansion unavailable");
        assert!(result.terms.contains(&"bubble".to_string()));
        assert!(result.terms.contains(&"hype".to_string()));
        assert!(!result.terms.contains(&"skeptic".to_string()));
        assert_eq!(understanding.calls(), 0);
    }

    #[tokio::test]
    async fn test_fallback_totality() {
        for remote_kind in 0..3 {
            for understanding_kind in 0..4 {
                for query in ["is AI a bubble", THIN_QUERY] {
                    let remote = match remote_kind {
                        0 => StubRemote::unavailable(),
                        1 => StubRemote::failing(ProviderError::Transport("refused".to_string())),
                        _ => StubRemote::ok(machine_learning()),
                    };
                    let mut expander =
                        Expander::new(ExpansionConfig::default()).with_remote_provider(remote);
                    let understanding_ok = understanding_kind == 3;
                    match understanding_kind {
                        0 => {}
                        1 => expander = expander.with_understanding_provider(StubUnderstanding::unavailable()),
                        2 => expander = expander.with_understanding_provider(StubUnderstanding::failing()),
                        _ => expander = expander.with_understanding_provider(StubUnderstanding::ok()),
                    }

                    let result = expander.expand_for_search(query).await;

                    let expected = if remote_kind == 2 || (query == THIN_QUERY && understanding_ok) {
                        ExpansionMethod::Ai
                    } else {
                        ExpansionMethod::Local
                    };
                    assert_eq!(
                        result.meta.method, expected,
                        "remote={} understanding={} query={}",
                        remote_kind, understanding_kind, query
                    );
                    assert!(!result.terms.is_empty());
                }
            }
        }
    }

    #[tokio::test]
    async fn test_expand_search_terms_body_of_work() {
        let expander = Expander::new(ExpansionConfig::default());
        let titles: &[&str] = &["AI safety research", "Is AI a bubble?"];

        let terms = expander.expand_search_terms(SearchInput::from(titles)).await;

        assert!(terms.contains(&"safety".to_string()));
        assert!(terms.contains(&"skeptic".to_string()));
        let mut deduped = terms.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), terms.len());

        // First entry's terms come first
        let first = expander.expand_search_terms("AI safety research").await;
        assert_eq!(&terms[..first.len()], &first[..]);
    }

    #[tokio::test]
    async fn test_from_config_without_url_or_key_is_local() {
        let expander =
            Expander::from_config(ExpansionConfig::default(), Arc::new(MockProvider::unavailable()));
        let result = expander.expand_search_terms_with_queries(THIN_QUERY).await;
        assert_eq!(result.meta.method, ExpansionMethod::Local);
    }

    #[tokio::test]
    async fn test_from_config_uses_injected_llm() {
        let llm = Arc::new(MockProvider::new(
            r#"{"intent": "baking", "concepts": ["fermentation"], "synonyms": ["levain"]}"#,
        ));
        let expander = Expander::from_config(ExpansionConfig::default(), llm.clone());
        let result = expander.expand_for_search(THIN_QUERY).await;

        assert_eq!(result.meta.method, ExpansionMethod::Ai);
        assert!(result.terms.contains(&"fermentation".to_string()));
        assert!(result.terms.contains(&"levain".to_string()));
        assert_eq!(llm.call_count(), 1);
    }

    proptest! {
        #[test]
        fn prop_terms_are_unique_and_meaningful(query in "[a-zA-Z ]{0,40}") {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let expander = Expander::new(ExpansionConfig::default());
            let result = rt.block_on(expander.expand_for_search(&query));

            let mut sorted = result.terms.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), result.terms.len());
            for term in &result.terms {
                prop_assert!(term.chars().count() > 2);
                prop_assert_eq!(term.clone(), term.to_lowercase());
            }
        }
    }
}
