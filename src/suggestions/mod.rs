//! AI task suggestions
//!
//! One request runs a fixed chain: build a prompt from the current tasks and
//! context entries, send it to the configured text-generation service, and
//! parse the reply into a title → [`SuggestionRecord`] mapping.

pub mod fetcher;
pub mod parser;
pub mod prompt;

pub use fetcher::{SuggestionFetcher, TextGenerator};
pub use parser::{parse_suggestions, strip_fence, validate_suggestions};
pub use prompt::build_prompt;

use crate::error::TodoError;
use crate::store::RecordStore;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Suggested changes for a single task
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuggestionRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhanced_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_category: Option<String>,
    /// Any extra fields the model returned, plus known fields whose value
    /// could not be decoded
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub(crate) const KNOWN_FIELDS: [&str; 4] = [
    "priority_score",
    "suggested_deadline",
    "enhanced_description",
    "suggested_category",
];

impl SuggestionRecord {
    /// Best-effort decode of one reply entry. A known field whose value has
    /// the wrong type is left in `extra` untouched.
    pub fn from_object(mut fields: Map<String, Value>) -> Self {
        Self {
            priority_score: take_field(&mut fields, "priority_score", score_from_value),
            suggested_deadline: take_field(&mut fields, "suggested_deadline", text_from_value),
            enhanced_description: take_field(&mut fields, "enhanced_description", text_from_value),
            suggested_category: take_field(&mut fields, "suggested_category", text_from_value),
            extra: fields,
        }
    }
}

/// One value of the reply mapping
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SuggestionEntry {
    Record(SuggestionRecord),
    /// Entry that was not a JSON object, returned as the model sent it
    Unstructured(Value),
}

impl SuggestionEntry {
    pub fn record(&self) -> Option<&SuggestionRecord> {
        match self {
            SuggestionEntry::Record(record) => Some(record),
            SuggestionEntry::Unstructured(_) => None,
        }
    }
}

impl From<Value> for SuggestionEntry {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => SuggestionEntry::Record(SuggestionRecord::from_object(fields)),
            other => SuggestionEntry::Unstructured(other),
        }
    }
}

impl From<SuggestionRecord> for SuggestionEntry {
    fn from(record: SuggestionRecord) -> Self {
        SuggestionEntry::Record(record)
    }
}

/// Task title → suggestion. At most one entry per title.
pub type SuggestionMap = BTreeMap<String, SuggestionEntry>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SuggestionError {
    #[error("LLM service credential not configured.")]
    Configuration,

    #[error("Failed to get suggestions from AI: {0}")]
    Service(String),

    #[error("Failed to get suggestions from AI: {0}")]
    MalformedResponse(String),
}

impl SuggestionError {
    pub fn to_error_code(&self) -> &'static str {
        match self {
            SuggestionError::Configuration => "LLM_NOT_CONFIGURED",
            SuggestionError::Service(_) => "LLM_SERVICE_ERROR",
            SuggestionError::MalformedResponse(_) => "LLM_MALFORMED_RESPONSE",
        }
    }
}

/// Problems in an otherwise usable response
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SuggestionWarning {
    #[error("priority_score {score} for '{title}' is outside 0.0..=1.0")]
    PriorityOutOfRange { title: String, score: f64 },

    #[error("suggested_deadline '{value}' for '{title}' is not YYYY-MM-DD")]
    InvalidDeadline { title: String, value: String },

    #[error("no suggestion returned for task '{title}'")]
    MissingSuggestion { title: String },

    #[error("suggestion returned for unknown task '{title}'")]
    UnexpectedTitle { title: String },

    #[error("{field} for '{title}' is {kind}, kept as returned")]
    InvalidField {
        title: String,
        field: &'static str,
        kind: &'static str,
    },

    #[error("suggestion for '{title}' is {kind} instead of an object")]
    NotAnObject { title: String, kind: &'static str },
}

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("No tasks found to analyze.")]
    NoTasks,

    #[error(transparent)]
    Store(#[from] TodoError),

    #[error(transparent)]
    Suggestion(#[from] SuggestionError),
}

/// Read every task and context entry from `store` and ask for suggestions.
///
/// Returns [`AnalyzeError::NoTasks`] without touching the fetcher when the
/// store holds no tasks.
pub async fn analyze(
    store: &dyn RecordStore,
    fetcher: &SuggestionFetcher,
) -> Result<SuggestionMap, AnalyzeError> {
    let tasks = store.list_tasks().await?;
    if tasks.is_empty() {
        return Err(AnalyzeError::NoTasks);
    }
    let contexts = store.list_context_entries().await?;

    tracing::info!(
        task_count = tasks.len(),
        context_count = contexts.len(),
        "Requesting AI suggestions"
    );

    let prompt = build_prompt(&contexts, &tasks);
    let raw = fetcher.fetch(&prompt).await.inspect_err(|e| {
        tracing::error!(error = %e, "AI suggestion request failed");
    })?;

    let suggestions = parse_suggestions(&raw).inspect_err(|e| {
        tracing::error!(error = %e, "AI response could not be parsed");
    })?;

    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    for warning in validate_suggestions(&suggestions, &titles) {
        tracing::warn!(%warning, "Suggestion accepted with warning");
    }

    tracing::info!(suggestion_count = suggestions.len(), "AI suggestions ready");
    Ok(suggestions)
}

fn take_field<T>(
    fields: &mut Map<String, Value>,
    key: &str,
    decode: fn(&Value) -> Option<T>,
) -> Option<T> {
    let decoded = fields.get(key).and_then(decode)?;
    fields.remove(key);
    Some(decoded)
}

/// Models sometimes quote numbers; accept `0.8` and `"0.8"` alike.
fn score_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn text_from_value(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}
