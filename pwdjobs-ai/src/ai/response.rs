//! Model response normalization
//!
//! Models are told to return bare JSON but often wrap it in markdown fences or
//! a sentence of prose. Everything here is pure so it can be tested without a
//! provider.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::AiError;

/// Strip leading/trailing markdown code fences (```` ``` ```` or ```` ```json ````)
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the language tag along with the opening fence
        text = match rest.find('\n') {
            Some(idx) => &rest[idx + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
    }

    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Parse model text into a JSON object
///
/// Falls back to the outermost `{ ... }` span when the model surrounded the
/// object with prose.
pub fn parse_json_object(raw: &str) -> Result<Value, AiError> {
    let text = strip_code_fences(raw);
    if text.is_empty() {
        return Err(AiError::EmptyResponse);
    }

    let parsed = match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(first_err) => {
            let span = match (text.find('{'), text.rfind('}')) {
                (Some(start), Some(end)) if end > start => &text[start..=end],
                _ => return Err(AiError::Parse(first_err.to_string())),
            };
            serde_json::from_str::<Value>(span).map_err(|e| AiError::Parse(e.to_string()))?
        }
    };

    if parsed.is_object() {
        Ok(parsed)
    } else {
        Err(AiError::Parse(format!(
            "expected a JSON object, got {}",
            json_type_name(&parsed)
        )))
    }
}

/// Pull the required top-level key out of a model object and decode it
///
/// A missing or null key and a value that does not fit `T` are both treated as
/// a malformed response.
pub fn extract_required<T: DeserializeOwned>(value: Value, key: &str) -> Result<T, AiError> {
    let Value::Object(mut map) = value else {
        return Err(AiError::Parse("expected a JSON object".to_string()));
    };

    match map.remove(key) {
        None | Some(Value::Null) => Err(AiError::MissingKey(key.to_string())),
        Some(inner) => serde_json::from_value(inner)
            .map_err(|e| AiError::Schema(format!("`{}`: {}", key, e))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
