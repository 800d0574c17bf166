//! Request and response types for expansion

use serde::{Deserialize, Serialize};

/// Output of the quick query-understanding call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryUnderstanding {
    /// What the user is trying to find
    pub intent: String,

    /// Key concepts behind the query
    pub concepts: Vec<String>,

    /// Alternative words for the query
    pub synonyms: Vec<String>,
}

/// Input to term expansion: a single query or a body of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchInput {
    /// One search string
    Single(String),

    /// Several strings (titles, topics) expanded independently and unioned
    Many(Vec<String>),
}

impl From<&str> for SearchInput {
    fn from(s: &str) -> Self {
        SearchInput::Single(s.to_string())
    }
}

impl From<String> for SearchInput {
    fn from(s: String) -> Self {
        SearchInput::Single(s)
    }
}

impl From<Vec<String>> for SearchInput {
    fn from(v: Vec<String>) -> Self {
        SearchInput::Many(v)
    }
}

impl From<&[&str]> for SearchInput {
    fn from(v: &[&str]) -> Self {
        SearchInput::Many(v.iter().map(|s| s.to_string()).collect())
    }
}

impl SearchInput {
    /// The individual strings to expand
    pub fn into_queries(self) -> Vec<String> {
        match self {
            SearchInput::Single(s) => vec![s],
            SearchInput::Many(v) => v,
        }
    }
}
