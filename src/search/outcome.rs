//! Search outcomes and result rendering

use serde_json::Value;
use std::fmt;

/// Returned when the service finds nothing
pub const NO_RESULTS_MESSAGE: &str = "No relevant datasets found.";

/// Result of one search round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Rendered result list
    Success(String),
    /// The service returned no results
    EmptyResult,
    /// A required setting is missing
    ConfigError(String),
    /// Network failure, timeout or non-2xx status
    TransportError(String),
    /// Any other failure, e.g. an unparseable body
    UnexpectedError(String),
}

impl SearchOutcome {
    /// Whether the search reached the service and got an answer
    pub fn is_ok(&self) -> bool {
        matches!(self, SearchOutcome::Success(_) | SearchOutcome::EmptyResult)
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchOutcome::Success(text) => f.write_str(text),
            SearchOutcome::EmptyResult => f.write_str(NO_RESULTS_MESSAGE),
            SearchOutcome::ConfigError(message) => f.write_str(message),
            SearchOutcome::TransportError(message) => write!(f, "API request error: {}", message),
            SearchOutcome::UnexpectedError(message) => write!(f, "Unexpected error: {}", message),
        }
    }
}

impl From<SearchOutcome> for String {
    fn from(outcome: SearchOutcome) -> Self {
        outcome.to_string()
    }
}

/// Pull the `results` entries out of a response body
///
/// A missing, null or otherwise empty `results` field yields no entries. An
/// array yields its elements; any other non-empty value is a single entry.
pub fn extract_results(body: &str) -> Result<Vec<Value>, String> {
    let json: Value = serde_json::from_str(body).map_err(|e| e.to_string())?;
    let object = json
        .as_object()
        .ok_or_else(|| format!("expected a JSON object, got {}", kind(&json)))?;

    Ok(match object.get("results") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(Value::String(s)) if s.is_empty() => Vec::new(),
        Some(Value::Object(map)) if map.is_empty() => Vec::new(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Vec::new(),
        Some(other) => vec![other.clone()],
    })
}

/// Render entries as a numbered list, strings verbatim and everything else as JSON
pub fn render_results(results: &[Value]) -> String {
    let mut out = format!("Found {} relevant result(s):", results.len());
    for (i, entry) in results.iter().enumerate() {
        let text = match entry {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        out.push_str(&format!("\n{}. {}", i + 1, text));
    }
    out
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
