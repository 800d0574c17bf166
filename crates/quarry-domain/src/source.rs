//! Source module - published content attributed to an entity
//!
//! Source dates come from many places (feeds, manual curation, scraped pages)
//! and are frequently partial: a bare year, a month and year, or missing
//! entirely. Only the year is ever needed downstream, so parsing is reduced to
//! finding a plausible four-digit year anywhere in the string, or the year of
//! a compact `YYYYMMDD` date.

use serde::{Deserialize, Deserializer, Serialize};

/// Earliest year accepted as a publication date
pub const MIN_SOURCE_YEAR: i32 = 1900;

/// Latest year accepted as a publication date
pub const MAX_SOURCE_YEAR: i32 = 2100;

/// Kind of published content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Academic or technical paper
    Paper,
    /// Blog post or essay
    Blog,
    /// Recorded video
    Video,
    /// Podcast episode
    Podcast,
    /// Interview
    Interview,
    /// Short social media post
    Tweet,
    /// Book
    Book,
    /// Conference or public talk
    Talk,
    /// Anything else
    #[default]
    Other,
}

impl SourceType {
    /// Get the type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Paper => "paper",
            SourceType::Blog => "blog",
            SourceType::Video => "video",
            SourceType::Podcast => "podcast",
            SourceType::Interview => "interview",
            SourceType::Tweet => "tweet",
            SourceType::Book => "book",
            SourceType::Talk => "talk",
            SourceType::Other => "other",
        }
    }

    /// Parse a source type, ignoring case; unknown names map to `Other`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "paper" => SourceType::Paper,
            "blog" => SourceType::Blog,
            "video" => SourceType::Video,
            "podcast" => SourceType::Podcast,
            "interview" => SourceType::Interview,
            "tweet" => SourceType::Tweet,
            "book" => SourceType::Book,
            "talk" => SourceType::Talk,
            _ => SourceType::Other,
        }
    }
}

impl<'de> Deserialize<'de> for SourceType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(SourceType::parse(&raw))
    }
}

/// One piece of published content attributed to an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Title of the content
    pub title: String,

    /// Link to the content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Publication date in whatever precision is known
    #[serde(default)]
    pub date: Option<String>,

    /// Kind of content
    #[serde(rename = "type", default)]
    pub source_type: SourceType,

    /// Short summary of the content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl Source {
    /// Create a new source with a title and type
    pub fn new(title: impl Into<String>, source_type: SourceType) -> Self {
        Self {
            title: title.into(),
            url: None,
            date: None,
            source_type,
            summary: None,
        }
    }

    /// Set the publication date
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Set the summary
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Set the URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Publication year, if the date contains a plausible one
    ///
    /// Accepts "2024", "2024-03-01", "March 2024", "03/2024" and similar.
    pub fn year(&self) -> Option<i32> {
        self.date.as_deref().and_then(parse_year)
    }

    /// Most recent publication year across a set of sources
    pub fn most_recent_year(sources: &[Source]) -> Option<i32> {
        sources.iter().filter_map(Source::year).max()
    }
}

/// Find the first digit run that is a plausible year, either standalone
/// (`2024`) or leading a compact date (`20240301`)
fn parse_year(date: &str) -> Option<i32> {
    let bytes = date.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let run = &date[start..i];
        let year = match run.len() {
            4 => run.parse::<i32>().ok(),
            8 if is_compact_date(run) => run[..4].parse::<i32>().ok(),
            _ => None,
        };
        if let Some(year) = year.filter(|y| (MIN_SOURCE_YEAR..=MAX_SOURCE_YEAR).contains(y)) {
            return Some(year);
        }
    }
    None
}

/// `YYYYMMDD` with a real month and day-of-month range
fn is_compact_date(run: &str) -> bool {
    let month = run[4..6].parse::<u32>().unwrap_or(0);
    let day = run[6..8].parse::<u32>().unwrap_or(0);
    (1..=12).contains(&month) && (1..=31).contains(&day)
}
