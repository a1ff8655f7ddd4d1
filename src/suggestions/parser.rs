use super::{SuggestionEntry, SuggestionError, SuggestionMap, SuggestionWarning, KNOWN_FIELDS};
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashSet;

const FENCE: &str = "```";

/// Remove the code fence a model tends to wrap around its JSON
pub fn strip_fence(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix(FENCE) {
        text = rest
            .strip_prefix("json")
            .or_else(|| rest.strip_prefix("JSON"))
            .unwrap_or(rest);
    }
    if let Some(rest) = text.strip_suffix(FENCE) {
        text = rest;
    }

    text.trim()
}

/// Parse a raw model reply into title → suggestion.
///
/// Every entry of the top-level object is kept. Unknown fields and values of
/// the wrong type pass through untouched; no type, range or format checks
/// happen here (see [`validate_suggestions`]).
pub fn parse_suggestions(raw: &str) -> Result<SuggestionMap, SuggestionError> {
    let body = strip_fence(raw);

    let value: Value = serde_json::from_str(body).map_err(|e| {
        SuggestionError::MalformedResponse(format!("invalid JSON in model response: {}", e))
    })?;

    let Value::Object(entries) = value else {
        return Err(SuggestionError::MalformedResponse(format!(
            "expected a JSON object at the top level, got {}",
            json_kind(&value)
        )));
    };

    let suggestions = entries
        .into_iter()
        .map(|(title, entry)| (title, SuggestionEntry::from(entry)))
        .collect();

    Ok(suggestions)
}

/// Soft checks over a parsed mapping. Nothing here rejects the response.
pub fn validate_suggestions<T: AsRef<str>>(
    suggestions: &SuggestionMap,
    task_titles: &[T],
) -> Vec<SuggestionWarning> {
    let mut warnings = Vec::new();

    for (title, entry) in suggestions {
        let record = match entry {
            SuggestionEntry::Record(record) => record,
            SuggestionEntry::Unstructured(value) => {
                warnings.push(SuggestionWarning::NotAnObject {
                    title: title.clone(),
                    kind: json_kind(value),
                });
                continue;
            },
        };

        for field in KNOWN_FIELDS {
            if let Some(value) = record.extra.get(field).filter(|v| !v.is_null()) {
                warnings.push(SuggestionWarning::InvalidField {
                    title: title.clone(),
                    field,
                    kind: json_kind(value),
                });
            }
        }

        if let Some(score) = record.priority_score {
            if !(0.0..=1.0).contains(&score) {
                warnings.push(SuggestionWarning::PriorityOutOfRange {
                    title: title.clone(),
                    score,
                });
            }
        }

        if let Some(deadline) = &record.suggested_deadline {
            if !is_iso_date(deadline) {
                warnings.push(SuggestionWarning::InvalidDeadline {
                    title: title.clone(),
                    value: deadline.clone(),
                });
            }
        }
    }

    let mut seen = HashSet::new();
    for title in task_titles {
        let title = title.as_ref();
        if seen.insert(title) && !suggestions.contains_key(title) {
            warnings.push(SuggestionWarning::MissingSuggestion {
                title: title.to_string(),
            });
        }
    }

    for title in suggestions.keys() {
        if !seen.contains(title.as_str()) {
            warnings.push(SuggestionWarning::UnexpectedTitle {
                title: title.clone(),
            });
        }
    }

    warnings
}

/// Strict `YYYY-MM-DD`
fn is_iso_date(value: &str) -> bool {
    value.len() == 10 && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
