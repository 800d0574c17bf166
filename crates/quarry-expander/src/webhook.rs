//! Remote expansion through a workflow webhook
//!
//! The webhook runs an LLM-backed workflow and answers with role/priority
//! tagged query variants. Two response shapes are in circulation and both
//! are accepted: `{"queries": [...]}` and `[{"queries": [...]}]`.

use crate::config::ExpansionConfig;
use crate::provider::{snippet, ExpansionProvider, ProviderError};
use async_trait::async_trait;
use quarry_domain::ExpandedQuery;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Wildcard substituted for spaces in `queryForDb`
pub const DB_WILDCARD: char = '%';

/// Remote expansion provider backed by a workflow webhook
pub struct WebhookExpansionProvider {
    url: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookRequest<'a> {
    query: &'a str,
    query_for_db: String,
}

impl WebhookExpansionProvider {
    /// Create a provider for `url`; `None` yields an unavailable provider
    pub fn new(url: Option<String>, timeout: Duration) -> Self {
        Self {
            url: url.filter(|u| !u.trim().is_empty()),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    /// Create a provider from the pipeline configuration
    pub fn from_config(config: &ExpansionConfig) -> Self {
        Self::new(config.webhook_url().map(str::to_string), config.timeout())
    }

    async fn post(&self, url: &str, query: &str) -> Result<Vec<ExpandedQuery>, ProviderError> {
        let body = WebhookRequest {
            query,
            query_for_db: query_for_db(query),
        };

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        parse_webhook_body(&text)
    }
}

#[async_trait]
impl ExpansionProvider for WebhookExpansionProvider {
    fn name(&self) -> &str {
        "webhook"
    }

    fn is_available(&self) -> bool {
        self.url.is_some()
    }

    async fn expand(&self, query: &str) -> Result<Vec<ExpandedQuery>, ProviderError> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| ProviderError::Unavailable("no webhook URL configured".to_string()))?;

        let sanitized = sanitize(query);
        if sanitized.is_empty() {
            return Err(ProviderError::Unavailable("empty query".to_string()));
        }

        debug!(query = %sanitized, timeout_ms = self.timeout.as_millis() as u64, "Calling expansion webhook");

        // Dropping the in-flight future on expiry cancels the request.
        match timeout(self.timeout, self.post(url, &sanitized)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.timeout)),
        }
    }
}

/// Collapse internal whitespace and trim
fn sanitize(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Spaces replaced with the database wildcard, for `LIKE` patterns downstream
fn query_for_db(query: &str) -> String {
    query.replace(' ', &DB_WILDCARD.to_string())
}

/// Parse a webhook response body into expanded queries
///
/// Roles and priorities are read leniently. Entries without query text, or
/// with a blank one, are skipped. A well-formed payload with no usable
/// entries counts as empty.
pub(crate) fn parse_webhook_body(body: &str) -> Result<Vec<ExpandedQuery>, ProviderError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::EmptyResponse);
    }

    let value: Value = serde_json::from_str(trimmed).map_err(|e| {
        warn!(snippet = %snippet(trimmed), "Webhook returned invalid JSON");
        ProviderError::MalformedResponse(format!("invalid JSON: {}", e))
    })?;

    let entries = match &value {
        Value::Array(items) => items.first().and_then(|first| first.get("queries")),
        Value::Object(_) => value.get("queries"),
        _ => None,
    }
    .and_then(Value::as_array)
    .ok_or_else(|| {
        warn!(snippet = %snippet(trimmed), "Webhook payload has no queries array");
        ProviderError::MalformedResponse("expected {queries: [...]} or [{queries: [...]}]".to_string())
    })?;

    let mut queries = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        match serde_json::from_value::<ExpandedQuery>(entry.clone()) {
            Ok(q) if !q.query.trim().is_empty() => queries.push(q),
            Ok(_) => debug!("Skipping expanded query {} with blank text", idx),
            Err(e) => warn!("Failed to parse expanded query {}: {}", idx, e),
        }
    }

    if queries.is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    Ok(queries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_domain::QueryRole;

    #[test]
    fn test_sanitize_and_db_query() {
        assert_eq!(sanitize("  is   ai\na bubble "), "is ai a bubble");
        assert_eq!(query_for_db("is ai a bubble"), "is%ai%a%bubble");
    }

    #[test]
    fn test_parse_object_payload() {
        let body = r#"{"queries": [{"query": "machine learning", "role": "context", "priority": 8}]}"#;
        let queries = parse_webhook_body(body).unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].query, "machine learning");
        assert_eq!(queries[0].role, QueryRole::Context);
        assert_eq!(queries[0].priority, 8);
    }

    #[test]
    fn test_parse_array_wrapped_payload() {
        let body = r#"[{"queries": [{"query": "ai ethics", "role": "core", "priority": 10, "hits": 4}]}]"#;
        let queries = parse_webhook_body(body).unwrap();
        assert_eq!(queries[0].hits, Some(4));
    }

    #[test]
    fn test_parse_empty_body() {
        assert_eq!(parse_webhook_body("   "), Err(ProviderError::EmptyResponse));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_webhook_body("<html>oops</html>"),
            Err(ProviderError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_unexpected_shapes() {
        for body in [r#""just a string""#, r#"{"results": []}"#, r#"[]"#, r#"{"queries": "nope"}"#] {
            assert!(
                matches!(parse_webhook_body(body), Err(ProviderError::MalformedResponse(_))),
                "body {} should be malformed",
                body
            );
        }
    }

    #[test]
    fn test_parse_skips_bad_entries() {
        let body = r#"{"queries": [
            {"query": "good one", "priority": 5},
            {"role": "core"},
            {"query": "   "},
            {"query": 42},
            {"query": "another", "priority": "high"}
        ]}"#;
        let queries = parse_webhook_body(body).unwrap();
        let texts: Vec<_> = queries.iter().map(|q| q.query.as_str()).collect();
        assert_eq!(texts, vec!["good one", "another"]);
        assert_eq!(queries[1].priority, 0);
    }

    #[test]
    fn test_parse_loose_role_and_priority() {
        let body = r#"{"queries": [{"query": "machine learning", "role": null, "priority": 8.0}]}"#;
        let queries = parse_webhook_body(body).unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].role, QueryRole::Related);
        assert_eq!(queries[0].priority, 8);
    }

    #[test]
    fn test_parse_empty_queries_is_empty_response() {
        assert_eq!(parse_webhook_body(r#"{"queries": []}"#), Err(ProviderError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_unconfigured_provider_is_unavailable() {
        let provider = WebhookExpansionProvider::new(None, Duration::from_millis(100));
        assert!(!provider.is_available());
        let result = provider.expand("anything").await;
        assert!(matches!(result, Err(ProviderError::Unavailable(_))));
    }

    #[test]
    fn test_from_config_prefers_test_url() {
        let mut config = ExpansionConfig::default();
        config.remote_url = Some("https://prod.example/hook".to_string());
        config.remote_test_url = Some("https://test.example/hook".to_string());
        let provider = WebhookExpansionProvider::from_config(&config);
        assert_eq!(provider.url.as_deref(), Some("https://test.example/hook"));
    }
}
