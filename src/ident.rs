//! Identifier normalization.
//!
//! Turns arbitrary human text into a lowercase, underscore-delimited token that
//! is safe to use as an anchor or lookup key in rendered output.
use serde_json::Value;

const REPLACED_CHARS: [char; 6] = [' ', '.', '-', '#', '+', '*'];

/// Normalize text into an identifier token.
///
/// Lowercases first, then maps separator characters to `_` and folds the
/// German umlauts and sharp s into ASCII digraphs.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        match ch {
            c if REPLACED_CHARS.contains(&c) => out.push('_'),
            'ä' => out.push_str("ae"),
            'ü' => out.push_str("ue"),
            'ö' => out.push_str("oe"),
            'ß' => out.push_str("ss"),
            c => out.push(c),
        }
    }
    out
}

/// Render a scalar document value as identifier text.
///
/// Returns `None` for `null` and for containers, which never carry an id.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
