//! Position verification types
//!
//! A position summary is free text describing an entity's stance. The
//! verifier proposes an analysis of whether that summary still holds; it never
//! mutates the summary itself.

use serde::{Deserialize, Serialize};

/// Confidence level of a verification, ordered `Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Weak or stale evidence
    Low,
    /// Reasonable evidence
    Medium,
    /// Strong, recent evidence
    High,
}

impl Confidence {
    /// Get the confidence name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }

    /// Parse a confidence level, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Confidence::Low),
            "medium" => Some(Confidence::Medium),
            "high" => Some(Confidence::High),
            _ => None,
        }
    }
}

/// How far a position has moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftSeverity {
    /// No movement
    #[default]
    None,
    /// Nuance or emphasis change
    Minor,
    /// Noticeable change of stance
    Moderate,
    /// Reversal or fundamentally different stance
    Significant,
}

impl ShiftSeverity {
    /// Get the severity name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftSeverity::None => "none",
            ShiftSeverity::Minor => "minor",
            ShiftSeverity::Moderate => "moderate",
            ShiftSeverity::Significant => "significant",
        }
    }

    /// Parse a severity, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Some(ShiftSeverity::None),
            "minor" => Some(ShiftSeverity::Minor),
            "moderate" => Some(ShiftSeverity::Moderate),
            "significant" => Some(ShiftSeverity::Significant),
            _ => None,
        }
    }

    /// Whether this severity counts as drift
    pub fn is_drift(&self) -> bool {
        matches!(self, ShiftSeverity::Moderate | ShiftSeverity::Significant)
    }
}

/// Analysis of a recorded position against newer sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionAnalysis {
    /// The summary still matches the sources
    pub aligned: bool,

    /// A change of stance was detected
    pub shift_detected: bool,

    /// Size of the detected change
    pub shift_severity: ShiftSeverity,

    /// What changed, if anything
    pub shift_summary: Option<String>,

    /// Topics present in sources but absent from the summary
    pub new_topics: Vec<String>,

    /// Proposed replacement summary; applying it is the caller's decision
    pub suggested_update: Option<String>,

    /// Confidence after calibration against source recency
    pub confidence: Confidence,

    /// Explanation, including any calibration notes
    pub reasoning: String,
}

impl PositionAnalysis {
    /// A low-confidence, unaligned analysis with the given reasoning
    ///
    /// Used for every path where evidence is missing or the AI output is
    /// unusable.
    pub fn inconclusive(reasoning: impl Into<String>) -> Self {
        Self {
            aligned: false,
            shift_detected: false,
            shift_severity: ShiftSeverity::None,
            shift_summary: None,
            new_topics: Vec::new(),
            suggested_update: None,
            confidence: Confidence::Low,
            reasoning: reasoning.into(),
        }
    }

    /// Derive the review status for this analysis
    pub fn status(&self) -> VerificationStatus {
        if self.shift_detected && self.shift_severity.is_drift() {
            VerificationStatus::DriftDetected
        } else if !self.aligned || self.confidence == Confidence::Low {
            VerificationStatus::NeedsReview
        } else {
            VerificationStatus::Verified
        }
    }
}

/// Review status derived from an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Summary holds with adequate confidence
    Verified,
    /// A human should look at it
    NeedsReview,
    /// The position has moved materially
    DriftDetected,
}

impl VerificationStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Verified => "verified",
            VerificationStatus::NeedsReview => "needs_review",
            VerificationStatus::DriftDetected => "drift_detected",
        }
    }
}

/// Full result of a verification call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionVerificationResult {
    /// The calibrated analysis
    #[serde(flatten)]
    pub analysis: PositionAnalysis,

    /// Status derived from the analysis
    pub status: VerificationStatus,

    /// Newest year found among the sources
    pub most_recent_source_year: Option<i32>,

    /// Whether the AI provider was asked at all
    pub ai_consulted: bool,
}

impl PositionVerificationResult {
    /// Wrap an analysis, deriving its status
    pub fn new(analysis: PositionAnalysis, most_recent_source_year: Option<i32>, ai_consulted: bool) -> Self {
        let status = analysis.status();
        Self {
            analysis,
            status,
            most_recent_source_year,
            ai_consulted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(aligned: bool, shift: bool, severity: ShiftSeverity, confidence: Confidence) -> PositionAnalysis {
        PositionAnalysis {
            aligned,
            shift_detected: shift,
            shift_severity: severity,
            shift_summary: None,
            new_topics: Vec::new(),
            suggested_update: None,
            confidence,
            reasoning: String::new(),
        }
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
    }

    #[test]
    fn test_status_drift_takes_precedence() {
        let a = analysis(false, true, ShiftSeverity::Significant, Confidence::Low);
        assert_eq!(a.status(), VerificationStatus::DriftDetected);

        let a = analysis(true, true, ShiftSeverity::Moderate, Confidence::High);
        assert_eq!(a.status(), VerificationStatus::DriftDetected);
    }

    #[test]
    fn test_status_minor_shift_is_not_drift() {
        let a = analysis(true, true, ShiftSeverity::Minor, Confidence::High);
        assert_eq!(a.status(), VerificationStatus::Verified);
    }

    #[test]
    fn test_status_needs_review() {
        let a = analysis(false, false, ShiftSeverity::None, Confidence::High);
        assert_eq!(a.status(), VerificationStatus::NeedsReview);

        let a = analysis(true, false, ShiftSeverity::None, Confidence::Low);
        assert_eq!(a.status(), VerificationStatus::NeedsReview);
    }

    #[test]
    fn test_status_verified() {
        let a = analysis(true, false, ShiftSeverity::None, Confidence::Medium);
        assert_eq!(a.status(), VerificationStatus::Verified);
    }

    #[test]
    fn test_inconclusive_is_low_and_needs_review() {
        let a = PositionAnalysis::inconclusive("No summary to verify");
        assert_eq!(a.confidence, Confidence::Low);
        assert!(!a.aligned);
        assert_eq!(a.status(), VerificationStatus::NeedsReview);
    }

    #[test]
    fn test_result_serializes_flat() {
        let result = PositionVerificationResult::new(PositionAnalysis::inconclusive("x"), Some(2024), false);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["confidence"], "low");
        assert_eq!(json["status"], "needs_review");
        assert_eq!(json["shiftSeverity"], "none");
        assert_eq!(json["mostRecentSourceYear"], 2024);
    }
}
