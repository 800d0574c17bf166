//! LLM prompt for position verification

use quarry_domain::Source;

/// Builds prompts asking the LLM to compare a stored position with newer sources
pub struct PromptBuilder<'a> {
    summary: &'a str,
    camp_context: Vec<&'a str>,
    sources: Vec<&'a Source>,
    current_year: i32,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(summary: &'a str, current_year: i32) -> Self {
        Self {
            summary,
            camp_context: Vec::new(),
            sources: Vec::new(),
            current_year,
        }
    }

    /// Add the camps the entity is filed under; blank entries are dropped
    pub fn with_camp_context(mut self, camp_context: &'a [String]) -> Self {
        self.camp_context = camp_context
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();
        self
    }

    /// Add up to `limit` sources, newest first
    pub fn with_sources(mut self, sources: &'a [Source], limit: usize) -> Self {
        self.sources = newest_first(sources);
        self.sources.truncate(limit);
        self
    }

    /// Build the complete verification prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(VERIFICATION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str(&format!("Current year: {}\n", self.current_year));
        if !self.camp_context.is_empty() {
            prompt.push_str(&format!("Filed under: {}\n", self.camp_context.join(", ")));
        }
        prompt.push('\n');

        prompt.push_str("Recorded position summary:\n---\n");
        prompt.push_str(self.summary.trim());
        prompt.push_str("\n---\n\n");

        prompt.push_str("Sources (newest first):\n");
        for source in &self.sources {
            prompt.push_str(&format_source(source));
        }
        prompt.push('\n');

        prompt.push_str(OUTPUT_FORMAT_REMINDER);
        prompt
    }
}

/// Sources ordered newest first; undated sources keep their relative order at the end
pub fn newest_first(sources: &[Source]) -> Vec<&Source> {
    let mut ordered: Vec<&Source> = sources.iter().collect();
    ordered.sort_by_key(|s| std::cmp::Reverse(s.year()));
    ordered
}

fn format_source(source: &Source) -> String {
    let date = source.date.as_deref().unwrap_or("undated");
    let mut line = format!("- [{}] ({}) {}", date, source.source_type.as_str(), source.title);
    if let Some(summary) = source.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        line.push_str(&format!(": {}", summary.trim()));
    }
    if let Some(url) = &source.url {
        line.push_str(&format!(" <{}>", url));
    }
    line.push('\n');
    line
}

const VERIFICATION_INSTRUCTIONS: &str = r#"You are checking whether a recorded summary of someone's position still holds.

Compare the recorded summary with the sources below. Decide:
1. Whether the summary is still aligned with what the sources say
2. Whether their stance has shifted, and how much (none, minor, moderate, significant)
3. Which topics appear in the sources but are missing from the summary
4. A suggested replacement summary, only if one is needed
5. How confident you are, given how much evidence the sources provide

Be conservative: prefer "medium" or "low" confidence when sources are few, old, or indirect."#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Respond with ONLY a JSON object (no prose, no markdown) in this shape:
{
  "aligned": true,
  "shiftDetected": false,
  "shiftSeverity": "none",
  "shiftSummary": null,
  "newTopics": [],
  "suggestedUpdate": null,
  "confidence": "medium",
  "reasoning": "One or two sentences"
}"#;
