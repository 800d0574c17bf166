//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use quarry_domain::{
    ExpandedQuery, ExpansionMethod, ExpansionResult, PositionVerificationResult, VerificationStatus,
};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a full expansion result.
    pub fn format_expansion(&self, result: &ExpansionResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            OutputFormat::Quiet => Ok(result.terms.join("\n")),
            OutputFormat::Table => {
                let color = match result.meta.method {
                    ExpansionMethod::Ai => "green",
                    ExpansionMethod::Local => "cyan",
                    ExpansionMethod::None => "yellow",
                };
                let mut out = self.colorize(&format!("[{}]", result.meta.method.as_str()), color);
                if !result.meta.description.is_empty() {
                    out.push(' ');
                    out.push_str(&result.meta.description);
                }
                out.push('\n');

                if let Some(queries) = &result.expanded_queries {
                    out.push_str(&self.queries_table(queries));
                    out.push('\n');
                }
                out.push_str(&self.format_terms(&result.terms)?);
                Ok(out)
            }
        }
    }

    /// Format expanded queries from the remote tier alone.
    pub fn format_queries(&self, queries: &[ExpandedQuery]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(queries)?),
            OutputFormat::Quiet => Ok(queries
                .iter()
                .map(|q| q.query.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => Ok(self.queries_table(queries)),
        }
    }

    /// Format a flat term list.
    pub fn format_terms(&self, terms: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(terms)?),
            OutputFormat::Quiet => Ok(terms.join("\n")),
            OutputFormat::Table => {
                if terms.is_empty() {
                    return Ok(self.colorize("No terms.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["#", "Term"]);
                for (idx, term) in terms.iter().enumerate() {
                    builder.push_record([(idx + 1).to_string(), term.clone()]);
                }
                Ok(self.finish_table(builder))
            }
        }
    }

    /// Format a single verification result.
    pub fn format_verification(&self, result: &PositionVerificationResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            OutputFormat::Quiet => Ok(result.status.as_str().to_string()),
            OutputFormat::Table => {
                let analysis = &result.analysis;
                let newest = result
                    .most_recent_source_year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "-".to_string());

                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                builder.push_record(["Status".to_string(), self.status(result.status)]);
                builder.push_record(["Confidence", analysis.confidence.as_str()]);
                builder.push_record(["Aligned".to_string(), analysis.aligned.to_string()]);
                builder.push_record([
                    "Shift".to_string(),
                    if analysis.shift_detected {
                        analysis.shift_severity.as_str().to_string()
                    } else {
                        "none".to_string()
                    },
                ]);
                if let Some(summary) = &analysis.shift_summary {
                    builder.push_record(["Shift summary", summary.as_str()]);
                }
                if !analysis.new_topics.is_empty() {
                    builder.push_record(["New topics".to_string(), analysis.new_topics.join(", ")]);
                }
                if let Some(update) = &analysis.suggested_update {
                    builder.push_record(["Suggested update", update.as_str()]);
                }
                builder.push_record(["Newest source".to_string(), newest]);
                builder.push_record(["AI consulted".to_string(), result.ai_consulted.to_string()]);
                builder.push_record(["Reasoning", analysis.reasoning.as_str()]);
                Ok(self.finish_table(builder))
            }
        }
    }

    /// Format several verification results.
    pub fn format_verifications(&self, results: &[PositionVerificationResult]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
            OutputFormat::Quiet => Ok(results
                .iter()
                .map(|r| r.status.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if results.is_empty() {
                    return Ok(self.colorize("No verification requests.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["#", "Status", "Confidence", "Newest", "Reasoning"]);
                for (idx, r) in results.iter().enumerate() {
                    builder.push_record([
                        (idx + 1).to_string(),
                        self.status(r.status),
                        r.analysis.confidence.as_str().to_string(),
                        r.most_recent_source_year
                            .map(|y| y.to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        r.analysis.reasoning.clone(),
                    ]);
                }
                Ok(self.finish_table(builder))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn queries_table(&self, queries: &[ExpandedQuery]) -> String {
        if queries.is_empty() {
            return self.colorize("No expanded queries.", "yellow");
        }
        let mut builder = Builder::default();
        builder.push_record(["Query", "Role", "Priority", "Hits"]);
        for q in queries {
            builder.push_record([
                q.query.clone(),
                q.role.as_str().to_string(),
                q.priority.to_string(),
                q.hits.map(|h| h.to_string()).unwrap_or_else(|| "-".to_string()),
            ]);
        }
        self.finish_table(builder)
    }

    fn finish_table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    fn status(&self, status: VerificationStatus) -> String {
        let color = match status {
            VerificationStatus::Verified => "green",
            VerificationStatus::NeedsReview => "yellow",
            VerificationStatus::DriftDetected => "red",
        };
        self.colorize(status.as_str(), color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
