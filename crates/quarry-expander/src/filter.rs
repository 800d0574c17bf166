//! Stopword/length filtering and phrase extraction

/// Words that carry no search signal
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "has", "have", "his", "how", "its", "may", "new", "now", "old", "see",
    "two", "who", "did", "does", "get", "got", "let", "put", "say", "she", "too", "use", "way",
    "with", "this", "that", "from", "they", "them", "then", "than", "there", "their", "what",
    "when", "where", "which", "while", "will", "would", "could", "should", "about", "into",
    "over", "under", "been", "being", "were", "your", "more", "most", "some", "such", "only",
    "just", "also", "very", "much", "many", "other", "these", "those", "here", "each", "why",
    "because", "think", "thinks", "people", "really",
];

/// Minimum characters for each phrase window size (3, 4, 5 words)
const WINDOW_MIN_CHARS: [(usize, usize); 3] = [(3, 8), (4, 10), (5, 12)];

/// Check whether a lowercase word is a stopword
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Check whether a single token carries search signal
pub fn is_meaningful(word: &str) -> bool {
    word.chars().count() > 2
        && !is_stopword(&word.to_lowercase())
        && word.chars().any(char::is_alphabetic)
}

/// Keep tokens longer than two characters that are not stopwords and contain a letter
///
/// Pure and idempotent: filtering an already filtered list changes nothing.
pub fn filter_meaningful<S: AsRef<str>>(words: &[S]) -> Vec<String> {
    words
        .iter()
        .map(AsRef::as_ref)
        .filter(|w| is_meaningful(w))
        .map(str::to_string)
        .collect()
}

/// Lowercase and split text into words, trimming surrounding punctuation
///
/// Inner hyphens and apostrophes survive ("open-source", "don't").
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Meaningful words of a text, in order, without repeats
pub fn meaningful_words(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for word in filter_meaningful(&tokenize(text)) {
        if !out.contains(&word) {
            out.push(word);
        }
    }
    out
}

/// Surface human-meaningful sub-phrases of a longer query
///
/// For queries of three or more words, returns the whole query followed by
/// every contiguous 3-, 4- and 5-word window whose length exceeds 8, 10 and 12
/// characters respectively. Shorter queries yield nothing.
pub fn extract_phrases(query: &str) -> Vec<String> {
    let words = tokenize(query);
    if words.len() < 3 {
        return Vec::new();
    }

    let mut phrases = vec![words.join(" ")];
    for (size, min_chars) in WINDOW_MIN_CHARS {
        if words.len() < size {
            continue;
        }
        for window in words.windows(size) {
            let phrase = window.join(" ");
            if phrase.chars().count() > min_chars && !phrases.contains(&phrase) {
                phrases.push(phrase);
            }
        }
    }
    phrases
}
