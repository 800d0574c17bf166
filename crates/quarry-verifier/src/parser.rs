//! Parse LLM output into a position analysis

use quarry_domain::{Confidence, PositionAnalysis, ShiftSeverity};
use quarry_llm::parse_json_object;
use serde_json::Value;
use tracing::{debug, warn};

/// Parse the model reply into a [`PositionAnalysis`]
///
/// The first balanced JSON object in the reply is used, so prose or code
/// fences around it are tolerated. `aligned` and a recognizable `confidence`
/// are required; everything else falls back to neutral defaults. Keys are
/// accepted in camelCase or snake_case.
pub fn parse_analysis(response: &str) -> Option<PositionAnalysis> {
    let json = match parse_json_object(response) {
        Some(json) => json,
        None => {
            warn!("No JSON object in verification reply ({} chars)", response.len());
            return None;
        }
    };

    let aligned = field(&json, "aligned", "aligned").and_then(Value::as_bool);
    let confidence = field(&json, "confidence", "confidence")
        .and_then(Value::as_str)
        .and_then(Confidence::parse);

    let (aligned, confidence) = match (aligned, confidence) {
        (Some(a), Some(c)) => (a, c),
        _ => {
            debug!("Verification reply missing aligned/confidence: {}", json);
            return None;
        }
    };

    let shift_severity = field(&json, "shiftSeverity", "shift_severity")
        .and_then(Value::as_str)
        .and_then(ShiftSeverity::parse)
        .unwrap_or_default();

    let shift_detected = field(&json, "shiftDetected", "shift_detected")
        .and_then(Value::as_bool)
        .unwrap_or(shift_severity != ShiftSeverity::None);

    Some(PositionAnalysis {
        aligned,
        shift_detected,
        shift_severity,
        shift_summary: text(&json, "shiftSummary", "shift_summary"),
        new_topics: field(&json, "newTopics", "new_topics")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        suggested_update: text(&json, "suggestedUpdate", "suggested_update"),
        confidence,
        reasoning: text(&json, "reasoning", "reasoning").unwrap_or_default(),
    })
}

fn field<'a>(json: &'a Value, camel: &str, snake: &str) -> Option<&'a Value> {
    json.get(camel).or_else(|| json.get(snake))
}

fn text(json: &Value, camel: &str, snake: &str) -> Option<String> {
    field(json, camel, snake)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
