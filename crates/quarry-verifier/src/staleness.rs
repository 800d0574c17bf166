//! Source-recency calibration
//!
//! Models tend to report high confidence no matter how old the evidence is.
//! These rules cap confidence by the age of the newest source and never
//! raise it.

use quarry_domain::{Confidence, PositionAnalysis, Source};

/// Newest source at least this old forces confidence to low
pub const FORCE_LOW_AGE: i32 = 3;

/// Newest source at least this old caps high confidence at medium
pub const CAP_MEDIUM_AGE: i32 = 2;

/// How recent the evidence is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recency {
    /// No source carries a usable date
    Undated,

    /// Newest source is older than the staleness threshold
    Stale {
        /// Newest source year
        year: i32,
        /// Years between it and now
        age: i32,
    },

    /// Recent enough to be worth asking about
    Current {
        /// Newest source year
        year: i32,
        /// Years between it and now
        age: i32,
    },
}

impl Recency {
    /// Classify a set of sources against the current year
    pub fn assess(sources: &[Source], current_year: i32, stale_after_years: i32) -> Self {
        match Source::most_recent_year(sources) {
            None => Recency::Undated,
            Some(year) => {
                // Future-dated sources count as brand new.
                let age = (current_year - year).max(0);
                if age > stale_after_years {
                    Recency::Stale { year, age }
                } else {
                    Recency::Current { year, age }
                }
            }
        }
    }

    /// Reasoning text for the short-circuit paths
    pub fn reasoning(&self) -> Option<String> {
        match self {
            Recency::Undated => Some("No dated sources available; cannot check the position against recent evidence".to_string()),
            Recency::Stale { year, age } => Some(format!(
                "Most recent source is from {} ({}y ago); too old to confirm the current position",
                year, age
            )),
            Recency::Current { .. } => None,
        }
    }
}

/// Cap confidence by source age, appending a note when it changes
///
/// Returns true when the confidence was lowered.
pub fn apply_confidence_override(analysis: &mut PositionAnalysis, age: i32) -> bool {
    let capped = if age >= FORCE_LOW_AGE && analysis.confidence != Confidence::Low {
        Confidence::Low
    } else if age >= CAP_MEDIUM_AGE && analysis.confidence == Confidence::High {
        Confidence::Medium
    } else {
        return false;
    };

    let note = format!(
        "[Confidence lowered from {} to {}: most recent source is {}y old]",
        analysis.confidence.as_str(),
        capped.as_str(),
        age
    );
    analysis.reasoning = if analysis.reasoning.trim().is_empty() {
        note
    } else {
        format!("{} {}", analysis.reasoning.trim_end(), note)
    };
    analysis.confidence = capped;
    true
}
