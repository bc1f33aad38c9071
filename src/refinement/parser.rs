//! Best-effort extraction of a suggestion list from free-form model output.
//!
//! The model is asked for a bare JSON array but is not contractually bound to
//! emit only that. Everything between the first `[` and the last `]` is
//! treated as the candidate array; anything that fails to decode degrades
//! silently to an empty list.

use super::types::{RefinementSuggestion, Severity, SuggestionType};
use serde_json::Value;

/// Parse suggestions out of raw model output. Never fails; the empty list is
/// the fallback for every malformed shape.
pub fn parse_suggestions(raw: &str) -> Vec<RefinementSuggestion> {
    let trimmed = raw.trim();
    let candidate = match (trimmed.find('['), trimmed.rfind(']')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    };

    let Ok(Value::Array(items)) = serde_json::from_str::<Value>(candidate) else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| suggestion_from_value(index, item))
        .collect()
}

fn suggestion_from_value(index: usize, item: &Value) -> Option<RefinementSuggestion> {
    let object = item.as_object()?;
    // The summary must already be a string; elements without one are dropped
    // rather than defaulted.
    let summary = object.get("summary")?.as_str()?.to_string();

    let id = coerce_to_string(object.get("id")).unwrap_or_else(|| (index + 1).to_string());
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<SuggestionType>().ok())
        .unwrap_or(SuggestionType::Other);
    let severity = object
        .get("severity")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Severity>().ok());

    Some(RefinementSuggestion {
        id,
        kind,
        summary,
        detail: coerce_to_string(object.get("detail")),
        anchor: coerce_to_string(object.get("anchor")),
        severity,
    })
}

/// Models emit ids and details as strings or numbers interchangeably.
fn coerce_to_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    }
}
