//! Search-term assembly
//!
//! Terms from every tier end up in a [`TermSet`]: lowercase, longer than two
//! characters, not stopwords, unique, and in first-seen order.

use crate::filter::{filter_meaningful, is_meaningful, tokenize};
use quarry_domain::ExpandedQuery;

/// Ordered, duplicate-free collection of search terms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermSet {
    terms: Vec<String>,
}

impl TermSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single term as-is (lowercased), if it is not already present
    pub fn insert(&mut self, term: impl AsRef<str>) -> bool {
        let term = term.as_ref().trim().to_lowercase();
        if term.is_empty() || self.terms.contains(&term) {
            return false;
        }
        self.terms.push(term);
        true
    }

    /// Add terms as-is, skipping any already present
    pub fn extend<I, S>(&mut self, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for term in terms {
            self.insert(term);
        }
    }

    /// Tokenize each phrase and add its meaningful words
    pub fn extend_words<I, S>(&mut self, phrases: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for phrase in phrases {
            self.extend(filter_meaningful(&tokenize(phrase.as_ref())));
        }
    }

    /// Add phrases (lowercased) that pass the length rule, skipping stopwords
    pub fn extend_filtered<I, S>(&mut self, phrases: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for phrase in phrases {
            let phrase = phrase.as_ref().trim().to_lowercase();
            if is_meaningful(&phrase) {
                self.insert(phrase);
            }
        }
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Consume the set, returning terms in first-seen order
    pub fn into_vec(self) -> Vec<String> {
        self.terms
    }
}

/// Flatten expanded queries into search terms
///
/// Each query contributes its meaningful words, and queries of two or more
/// words also contribute the full lowercase phrase.
pub fn extract_search_terms(queries: &[ExpandedQuery]) -> Vec<String> {
    let mut set = TermSet::new();
    for q in queries {
        let words = tokenize(&q.query);
        set.extend(filter_meaningful(&words));
        if words.len() >= 2 {
            set.insert(words.join(" "));
        }
    }
    set.into_vec()
}
