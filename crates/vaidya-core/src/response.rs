//! Turning a raw `ModelResponse` into a JSON object ready for validation.

use serde_json::Value;

use vaidya_contracts::{
    error::{VaidyaError, VaidyaResult},
    invocation::ModelResponse,
};

const FENCE_JSON: &str = "```json";
const FENCE: &str = "```";

/// Parse a model response into a JSON value.
///
/// - `Structured(null)`, blank text, and an empty object are `EmptyOutput`.
/// - Text is tried as JSON directly, then as the first fenced ```json block,
///   then as the outermost `{...}` span.
/// - Text that yields no JSON at all is a `SchemaViolation`.
pub fn parse_response(response: ModelResponse) -> VaidyaResult<Value> {
    let value = match response {
        ModelResponse::Structured(value) => value,
        ModelResponse::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(VaidyaError::EmptyOutput {
                    reason: "model returned blank text".to_string(),
                });
            }
            parse_text(trimmed)?
        }
    };

    match &value {
        Value::Null => Err(VaidyaError::EmptyOutput {
            reason: "model returned null".to_string(),
        }),
        Value::Object(map) if map.is_empty() => Err(VaidyaError::EmptyOutput {
            reason: "model returned an empty object".to_string(),
        }),
        _ => Ok(value),
    }
}

fn parse_text(text: &str) -> VaidyaResult<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Ok(value);
    }

    if let Some(block) = fenced_block(text) {
        if let Ok(value) = serde_json::from_str::<Value>(block) {
            return Ok(value);
        }
    }

    if let Some(span) = object_span(text) {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            return Ok(value);
        }
    }

    Err(VaidyaError::SchemaViolation {
        reason: "model output is not valid JSON".to_string(),
    })
}

/// Contents of the first ```json fenced block.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find(FENCE_JSON)? + FENCE_JSON.len();
    let end = text[start..].find(FENCE)?;
    Some(text[start..start + end].trim())
}

/// The span from the first `{` to the last `}`.
fn object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
