//! Wire-format to view-model key normalization.
//!
//! The backend speaks snake_case JSON at every nesting level. View models
//! use camelCase. [`camelize`] rewrites every object key recursively and
//! leaves arrays and scalars structurally untouched, so the result can be
//! deserialized straight into `#[serde(rename_all = "camelCase")]` types.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Convert a single snake_case key to camelCase.
///
/// Empty segments produced by leading, trailing or repeated underscores are
/// skipped. A key with no non-empty segment is returned unchanged. All-caps
/// segments are treated as words, so `URL_PATH` becomes `urlPath`.
pub fn camel_case(key: &str) -> String {
    let mut segments = key.split('_').filter(|segment| !segment.is_empty());

    let Some(first) = segments.next() else {
        return key.to_string();
    };

    let mut out = String::with_capacity(key.len());
    push_leading_word(&mut out, first);

    for segment in segments {
        let mut chars = segment.chars();
        if let Some(head) = chars.next() {
            out.extend(head.to_uppercase());
            if has_lowercase(segment) {
                out.push_str(chars.as_str());
            } else {
                out.push_str(&chars.as_str().to_lowercase());
            }
        }
    }

    out
}

fn has_lowercase(segment: &str) -> bool {
    segment.chars().any(char::is_lowercase)
}

/// Lowercase the leading uppercase run of the first segment. When the run
/// is followed by a lowercase letter its last capital starts the next word
/// (`URLPath` -> `urlPath`).
fn push_leading_word(out: &mut String, segment: &str) {
    if !has_lowercase(segment) {
        out.push_str(&segment.to_lowercase());
        return;
    }

    let run: Vec<(usize, char)> = segment
        .char_indices()
        .take_while(|(_, c)| c.is_uppercase())
        .collect();
    let split = match run.as_slice() {
        [] => 0,
        [(_, head)] => head.len_utf8(),
        [.., (last, _)] => *last,
    };

    out.push_str(&segment[..split].to_lowercase());
    out.push_str(&segment[split..]);
}

/// Recursively rewrite every object key from snake_case to camelCase.
///
/// Returns a new value; the input is never modified. Total over all JSON
/// values and idempotent.
pub fn camelize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, inner) in map {
                let camel = camel_case(key);
                if out.insert(camel.clone(), camelize(inner)).is_some() {
                    tracing::debug!(
                        key = %key,
                        camel = %camel,
                        "camelized key collides with an earlier key, keeping the later value"
                    );
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(camelize).collect()),
        scalar => scalar.clone(),
    }
}

/// Camelize a wire record and deserialize it into a view model.
pub fn camelize_into<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(camelize(&value))
}
