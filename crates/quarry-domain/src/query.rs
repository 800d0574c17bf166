//! Query module - expanded query variants and input normalization

use serde::{Deserialize, Deserializer, Serialize};

/// Role of an expanded query relative to the user's original intent
///
/// Remote expansion tags each variant with a role; locally synthesized
/// variants from the quick understanding call use `LlmConcept`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryRole {
    /// The literal core of the query
    Core,

    /// Surrounding context for the query
    Context,

    /// Neighboring topics
    Adjacent,

    /// Alternative phrasings
    Alternative,

    /// Loosely related material
    #[default]
    Related,

    /// Concept surfaced by the quick AI analysis
    LlmConcept,
}

impl QueryRole {
    /// Get the role name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryRole::Core => "core",
            QueryRole::Context => "context",
            QueryRole::Adjacent => "adjacent",
            QueryRole::Alternative => "alternative",
            QueryRole::Related => "related",
            QueryRole::LlmConcept => "llm_concept",
        }
    }

    /// Parse a role from a string, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "core" => Some(QueryRole::Core),
            "context" => Some(QueryRole::Context),
            "adjacent" => Some(QueryRole::Adjacent),
            "alternative" => Some(QueryRole::Alternative),
            "related" => Some(QueryRole::Related),
            "llm_concept" => Some(QueryRole::LlmConcept),
            _ => None,
        }
    }
}

// Upstream workflows are not strict about role names; null or unknown is "related".
impl<'de> Deserialize<'de> for QueryRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(QueryRole::parse).unwrap_or_default())
    }
}

/// Numbers as upstream workflows actually send them
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LooseNumber {
    /// Rounded value; non-numeric text yields `None`
    fn rounded(&self) -> Option<i64> {
        match self {
            LooseNumber::Int(n) => Some(*n),
            LooseNumber::Float(f) if f.is_finite() => Some(f.round() as i64),
            LooseNumber::Float(_) => None,
            LooseNumber::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|f| f.round() as i64),
        }
    }
}

fn loose_priority<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LooseNumber>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|n| n.rounded())
        .map(|n| n.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
        .unwrap_or_default())
}

fn loose_hits<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LooseNumber>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|n| n.rounded())
        .and_then(|n| u32::try_from(n).ok()))
}

/// A single expanded variant of a user query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedQuery {
    /// The variant text
    pub query: String,

    /// How the variant relates to the original query
    #[serde(default)]
    pub role: QueryRole,

    /// Relevance priority; higher is more relevant
    #[serde(default, deserialize_with = "loose_priority")]
    pub priority: i32,

    /// Optional hit count reported by the upstream workflow
    #[serde(default, deserialize_with = "loose_hits", skip_serializing_if = "Option::is_none")]
    pub hits: Option<u32>,
}

impl ExpandedQuery {
    /// Create a new expanded query without a hit count
    pub fn new(query: impl Into<String>, role: QueryRole, priority: i32) -> Self {
        Self {
            query: query.into(),
            role,
            priority,
            hits: None,
        }
    }

    /// Sort variants by priority, highest first
    ///
    /// The sort is stable, so equal priorities keep their upstream order.
    pub fn sort_by_priority(queries: &mut [ExpandedQuery]) {
        queries.sort_by(|a, b| b.priority.cmp(&a.priority));
    }
}

/// Normalize a raw query: lowercase, trimmed, internal whitespace collapsed
pub fn normalize_query(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_names() {
        for role in [
            QueryRole::Core,
            QueryRole::Context,
            QueryRole::Adjacent,
            QueryRole::Alternative,
            QueryRole::Related,
            QueryRole::LlmConcept,
        ] {
            assert_eq!(QueryRole::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_unknown_role_deserializes_as_related() {
        let q: ExpandedQuery =
            serde_json::from_str(r#"{"query": "x", "role": "tangent", "priority": 3}"#).unwrap();
        assert_eq!(q.role, QueryRole::Related);
        assert_eq!(q.priority, 3);
    }

    #[test]
    fn test_missing_role_and_priority_default() {
        let q: ExpandedQuery = serde_json::from_str(r#"{"query": "ai safety"}"#).unwrap();
        assert_eq!(q.role, QueryRole::Related);
        assert_eq!(q.priority, 0);
        assert_eq!(q.hits, None);
    }

    #[test]
    fn test_null_role_deserializes_as_related() {
        let q: ExpandedQuery =
            serde_json::from_str(r#"{"query": "machine learning", "role": null, "priority": 8}"#).unwrap();
        assert_eq!(q.role, QueryRole::Related);
        assert_eq!(q.priority, 8);
    }

    #[test]
    fn test_priority_accepts_floats_and_numeric_text() {
        let parse = |body: &str| serde_json::from_str::<ExpandedQuery>(body).unwrap();
        assert_eq!(parse(r#"{"query": "x", "priority": 8.0}"#).priority, 8);
        assert_eq!(parse(r#"{"query": "x", "priority": 6.6}"#).priority, 7);
        assert_eq!(parse(r#"{"query": "x", "priority": " 5 "}"#).priority, 5);
        assert_eq!(parse(r#"{"query": "x", "priority": "high"}"#).priority, 0);
        assert_eq!(parse(r#"{"query": "x", "priority": null}"#).priority, 0);
        assert_eq!(parse(r#"{"query": "x", "hits": 4.0}"#).hits, Some(4));
        assert_eq!(parse(r#"{"query": "x", "hits": -1}"#).hits, None);
    }

    #[test]
    fn test_role_serializes_snake_case() {
        let q = ExpandedQuery::new("alignment", QueryRole::LlmConcept, 8);
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains(r#""role":"llm_concept""#));
        assert!(!json.contains("hits"));
    }

    #[test]
    fn test_sort_by_priority_descending_and_stable() {
        let mut queries = vec![
            ExpandedQuery::new("a", QueryRole::Related, 2),
            ExpandedQuery::new("b", QueryRole::Core, 9),
            ExpandedQuery::new("c", QueryRole::Context, 2),
        ];
        ExpandedQuery::sort_by_priority(&mut queries);
        let order: Vec<_> = queries.iter().map(|q| q.query.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Is  AI\ta Bubble "), "is ai a bubble");
        assert_eq!(normalize_query("   "), "");
    }
}
