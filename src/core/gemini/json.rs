//! Lenient JSON extraction from model output.
//!
//! Models asked for JSON sometimes wrap it in prose or code fences. Parsing
//! first tries the raw text, then the widest `{...}` or `[...]` span.

use serde_json::Value;

use super::error::{GeminiError, Result};

/// Parse `text` as JSON, falling back to the widest embedded object or array
/// span when the raw text is not valid JSON on its own.
pub fn extract_json(text: &str) -> Result<Value> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(raw_err) => {
            if let Some(slice) = widest_json_span(text) {
                serde_json::from_str(slice).map_err(|_| {
                    GeminiError::Parse("could not parse extracted JSON block".to_string())
                })
            } else {
                Err(GeminiError::Parse(raw_err.to_string()))
            }
        }
    }
}

/// Widest candidate span: first `{` to last `}`, or first `[` to last `]`,
/// whichever starts earlier in the text.
fn widest_json_span(text: &str) -> Option<&str> {
    let object = span(text, '{', '}');
    let array = span(text, '[', ']');
    match (object, array) {
        (Some(o), Some(a)) => {
            if o.0 <= a.0 {
                Some(&text[o.0..o.1])
            } else {
                Some(&text[a.0..a.1])
            }
        }
        (Some(o), None) => Some(&text[o.0..o.1]),
        (None, Some(a)) => Some(&text[a.0..a.1]),
        (None, None) => None,
    }
}

fn span(text: &str, open: char, close: char) -> Option<(usize, usize)> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then_some((start, end + close.len_utf8()))
}
