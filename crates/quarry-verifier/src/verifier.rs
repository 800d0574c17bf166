//! Core Verifier implementation

use crate::config::VerifierConfig;
use crate::parser::parse_analysis;
use crate::prompt::PromptBuilder;
use crate::staleness::{apply_confidence_override, Recency};
use chrono::{Datelike, Utc};
use futures::future::join_all;
use quarry_domain::{PositionAnalysis, PositionVerificationResult, Source};
use quarry_llm::{GenerationOptions, LlmProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// One entity to verify
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    /// Recorded position summary
    pub summary: String,

    /// Sources to compare it with
    #[serde(default)]
    pub sources: Vec<Source>,

    /// Camps the entity is filed under
    #[serde(default)]
    pub camp_context: Vec<String>,
}

/// Checks recorded position summaries against newer sources
pub struct Verifier {
    llm: Arc<dyn LlmProvider>,
    config: VerifierConfig,
    current_year: Option<i32>,
}

impl Verifier {
    /// Create a new Verifier
    pub fn new(llm: Arc<dyn LlmProvider>, config: VerifierConfig) -> Self {
        Self {
            llm,
            config,
            current_year: None,
        }
    }

    /// Evaluate source ages against a fixed year instead of the clock
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = Some(year);
        self
    }

    /// Year source ages are measured against
    pub fn current_year(&self) -> i32 {
        self.current_year.unwrap_or_else(|| Utc::now().year())
    }

    /// Verify a recorded position summary against sources
    ///
    /// Never fails: missing evidence, an unconfigured provider and unusable
    /// AI output all produce a low-confidence result.
    pub async fn verify(
        &self,
        summary: &str,
        sources: &[Source],
        camp_context: &[String],
    ) -> PositionVerificationResult {
        let newest = Source::most_recent_year(sources);

        if summary.trim().is_empty() {
            debug!("Empty summary, nothing to verify");
            return PositionVerificationResult::new(
                PositionAnalysis::inconclusive("No summary to verify"),
                newest,
                false,
            );
        }

        let current_year = self.current_year();
        let recency = Recency::assess(sources, current_year, self.config.stale_after_years);
        let age = match recency {
            Recency::Current { age, .. } => age,
            Recency::Undated | Recency::Stale { .. } => {
                let reasoning = recency.reasoning().unwrap_or_default();
                info!(?newest, current_year, "Skipping AI verification: {}", reasoning);
                return PositionVerificationResult::new(
                    PositionAnalysis::inconclusive(reasoning),
                    newest,
                    false,
                );
            }
        };

        if !self.llm.is_available() {
            debug!(provider = self.llm.name(), "LLM provider not configured");
            return PositionVerificationResult::new(
                PositionAnalysis::inconclusive("AI analysis unavailable"),
                newest,
                false,
            );
        }

        let prompt = PromptBuilder::new(summary, current_year)
            .with_camp_context(camp_context)
            .with_sources(sources, self.config.max_sources)
            .build();
        debug!("Prompt length: {} chars", prompt.len());

        let mut analysis = self.analyze(&prompt).await;
        if apply_confidence_override(&mut analysis, age) {
            info!(age, confidence = analysis.confidence.as_str(), "Confidence capped by source age");
        }

        let result = PositionVerificationResult::new(analysis, newest, true);
        info!(
            status = result.status.as_str(),
            confidence = result.analysis.confidence.as_str(),
            "Verification complete"
        );
        result
    }

    /// Verify several entities concurrently; results follow input order
    pub async fn verify_batch(&self, requests: &[VerificationRequest]) -> Vec<PositionVerificationResult> {
        join_all(
            requests
                .iter()
                .map(|r| self.verify(&r.summary, &r.sources, &r.camp_context)),
        )
        .await
    }

    async fn analyze(&self, prompt: &str) -> PositionAnalysis {
        let options = GenerationOptions::new(self.config.max_output_tokens, self.config.temperature);

        let response = match timeout(self.config.timeout(), self.llm.generate(prompt, &options)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!("Verification call failed: {}", e);
                return PositionAnalysis::inconclusive("AI analysis failed");
            }
            Err(_) => {
                warn!("Verification call timed out after {:?}", self.config.timeout());
                return PositionAnalysis::inconclusive("AI analysis failed");
            }
        };

        debug!("LLM response length: {} chars", response.len());
        parse_analysis(&response)
            .unwrap_or_else(|| PositionAnalysis::inconclusive("Failed to parse AI response"))
    }
}
