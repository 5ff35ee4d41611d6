//! Strict parsing of the model's tag output.
//!
//! Exactly two shapes are accepted: a JSON object with a `tags` array of
//! strings, or a bare JSON array of strings. A markdown code fence around
//! either shape is tolerated (models add one despite instructions), but any
//! other structure is a parse failure.

use serde_json::Value;

use crate::error::TaggerError;

/// Parses and normalizes the model's reply into a tag list.
///
/// # Errors
///
/// Returns [`TaggerError::Parse`] when the text is not valid JSON, is
/// neither of the two accepted shapes, or contains non-string entries.
pub(crate) fn parse_tags(text: &str) -> Result<Vec<String>, TaggerError> {
    let json_text = strip_code_fence(text);

    let value: Value = serde_json::from_str(json_text).map_err(|e| TaggerError::Parse {
        reason: format!("invalid JSON: {e}"),
    })?;

    let entries = match &value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("tags") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(TaggerError::Parse {
                    reason: "\"tags\" field is not an array".to_owned(),
                })
            }
            None => {
                return Err(TaggerError::Parse {
                    reason: "object has no \"tags\" field".to_owned(),
                })
            }
        },
        _ => {
            return Err(TaggerError::Parse {
                reason: "expected a JSON array or an object with a \"tags\" array".to_owned(),
            })
        }
    };

    let mut tags = Vec::with_capacity(entries.len());
    for entry in entries {
        let Value::String(tag) = entry else {
            return Err(TaggerError::Parse {
                reason: format!("non-string tag entry: {entry}"),
            });
        };
        let normalized = tag.trim().to_lowercase();
        if !normalized.is_empty() {
            tags.push(normalized);
        }
    }

    Ok(tags)
}

/// Strips a surrounding markdown code fence, if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language hint on the opening fence line.
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
