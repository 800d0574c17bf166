//! Quick query understanding on top of any LLM provider
//!
//! A single short, low-temperature call that asks for the intent behind a
//! query plus a handful of concepts and synonyms. Used only when local
//! expansion leaves coverage thin.

use crate::config::ExpansionConfig;
use crate::provider::{snippet, ProviderError, UnderstandingProvider};
use crate::types::QueryUnderstanding;
use async_trait::async_trait;
use quarry_llm::{parse_json_object, GenerationOptions, LlmProvider};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Output budget for the understanding call
pub const UNDERSTANDING_MAX_TOKENS: u32 = 150;

/// Sampling temperature for the understanding call
pub const UNDERSTANDING_TEMPERATURE: f32 = 0.1;

const UNDERSTANDING_INSTRUCTIONS: &str = r#"You help a search engine understand short queries about debates and positions.
Analyze the query below and respond with ONLY a JSON object, no prose, in exactly this shape:
{"intent": "<what the user is looking for>", "concepts": ["<related concept>", ...], "synonyms": ["<alternative phrasing>", ...]}
Give at most 6 concepts and 4 synonyms. Use lowercase short phrases."#;

/// Understanding provider backed by an [`LlmProvider`]
pub struct QuickUnderstandingProvider {
    llm: Arc<dyn LlmProvider>,
    timeout: Duration,
    min_query_chars: usize,
}

impl QuickUnderstandingProvider {
    /// Wrap an LLM provider with explicit limits
    pub fn new(llm: Arc<dyn LlmProvider>, timeout: Duration, min_query_chars: usize) -> Self {
        Self {
            llm,
            timeout,
            min_query_chars,
        }
    }

    /// Wrap an LLM provider with the limits from the pipeline configuration
    pub fn from_config(llm: Arc<dyn LlmProvider>, config: &ExpansionConfig) -> Self {
        Self::new(
            llm,
            config.understanding_timeout(),
            config.understanding_min_query_chars,
        )
    }
}

#[async_trait]
impl UnderstandingProvider for QuickUnderstandingProvider {
    fn name(&self) -> &str {
        "quick-understanding"
    }

    fn is_available(&self) -> bool {
        self.llm.is_available()
    }

    async fn understand(&self, query: &str) -> Result<QueryUnderstanding, ProviderError> {
        if !self.llm.is_available() {
            return Err(ProviderError::Unavailable(format!(
                "LLM provider {} not configured",
                self.llm.name()
            )));
        }
        if query.chars().count() < self.min_query_chars {
            return Err(ProviderError::Unavailable(format!(
                "query shorter than {} characters",
                self.min_query_chars
            )));
        }

        let prompt = build_prompt(query);
        let options = GenerationOptions::new(UNDERSTANDING_MAX_TOKENS, UNDERSTANDING_TEMPERATURE);

        let text = match timeout(self.timeout, self.llm.generate(&prompt, &options)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => return Err(ProviderError::Transport(e.to_string())),
            Err(_) => return Err(ProviderError::Timeout(self.timeout)),
        };

        parse_understanding(&text)
    }
}

fn build_prompt(query: &str) -> String {
    format!("{}\n\nQuery: \"{}\"\n", UNDERSTANDING_INSTRUCTIONS, query)
}

/// Parse the model reply into a [`QueryUnderstanding`]
///
/// Requires a non-empty string `intent` and an array `concepts`; `synonyms`
/// is optional. Non-string array entries are skipped.
pub(crate) fn parse_understanding(text: &str) -> Result<QueryUnderstanding, ProviderError> {
    let value = parse_json_object(text).ok_or_else(|| {
        debug!(snippet = %snippet(text), "No JSON object in understanding reply");
        ProviderError::MalformedResponse("no JSON object in reply".to_string())
    })?;

    let intent = value
        .get("intent")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ProviderError::MalformedResponse("missing intent".to_string()))?;

    let concepts = value
        .get("concepts")
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::MalformedResponse("missing concepts array".to_string()))?;

    let synonyms = value
        .get("synonyms")
        .and_then(Value::as_array)
        .map(|items| strings(items))
        .unwrap_or_default();

    Ok(QueryUnderstanding {
        intent: intent.to_string(),
        concepts: strings(concepts),
        synonyms,
    })
}

fn strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_llm::MockProvider;

    const REPLY: &str = r#"Sure! {"intent": "whether ai is overvalued", "concepts": ["hype cycle", "valuation", 3], "synonyms": ["ai hype"]} Hope that helps."#;

    fn provider(mock: Arc<MockProvider>) -> QuickUnderstandingProvider {
        QuickUnderstandingProvider::new(mock, Duration::from_millis(500), 5)
    }

    #[test]
    fn test_parse_wrapped_reply() {
        let parsed = parse_understanding(REPLY).unwrap();
        assert_eq!(parsed.intent, "whether ai is overvalued");
        assert_eq!(parsed.concepts, vec!["hype cycle", "valuation"]);
        assert_eq!(parsed.synonyms, vec!["ai hype"]);
    }

    #[test]
    fn test_parse_synonyms_optional() {
        let parsed = parse_understanding(r#"{"intent": "x", "concepts": []}"#).unwrap();
        assert!(parsed.synonyms.is_empty());
    }

    #[test]
    fn test_parse_rejects_incomplete() {
        for text in [
            "no json here",
            r#"{"concepts": ["a"]}"#,
            r#"{"intent": "  ", "concepts": ["a"]}"#,
            r#"{"intent": "x", "concepts": "a"}"#,
        ] {
            assert!(matches!(
                parse_understanding(text),
                Err(ProviderError::MalformedResponse(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_understand_uses_short_low_temperature_call() {
        let mock = Arc::new(MockProvider::new(REPLY));
        let result = provider(mock.clone()).understand("is ai a bubble").await.unwrap();
        assert_eq!(result.concepts.len(), 2);

        let options = mock.last_options().unwrap();
        assert_eq!(options.max_output_tokens, 150);
        assert!((options.temperature - 0.1).abs() < f32::EPSILON);
        assert!(mock.last_prompt().unwrap().contains("is ai a bubble"));
    }

    #[tokio::test]
    async fn test_short_query_skips_call() {
        let mock = Arc::new(MockProvider::new(REPLY));
        let result = provider(mock.clone()).understand("ai").await;
        assert!(matches!(result, Err(ProviderError::Unavailable(_))));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_llm_skips_call() {
        let mock = Arc::new(MockProvider::unavailable());
        let p = provider(mock.clone());
        assert!(!p.is_available());
        assert!(p.understand("is ai a bubble").await.unwrap_err().is_unavailable());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_slow_llm_times_out() {
        let mock = Arc::new(MockProvider::new(REPLY).with_delay(Duration::from_secs(5)));
        let p = QuickUnderstandingProvider::new(mock, Duration::from_millis(50), 5);
        let result = p.understand("is ai a bubble").await;
        assert_eq!(result, Err(ProviderError::Timeout(Duration::from_millis(50))));
    }

    #[tokio::test]
    async fn test_llm_error_is_transport() {
        let mut mock = MockProvider::new(REPLY);
        mock.add_error("bubble");
        let result = provider(Arc::new(mock)).understand("is ai a bubble").await;
        assert!(matches!(result, Err(ProviderError::Transport(_))));
    }
}
