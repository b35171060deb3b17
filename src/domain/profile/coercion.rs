//! Lenient conversions from model-extracted JSON values to profile field types.
//!
//! Extraction replies are loosely typed: an age may come back as `35`,
//! `"35"` or `"35 years"`. These helpers accept the common shapes and
//! return `None` for anything else.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid number regex"));

/// Coerces to a non-negative integer.
pub fn coerce_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => coerce_f64(&Value::String(s.clone()))
            .filter(|f| *f >= 0.0)
            .map(|f| f.round() as u32),
        _ => None,
    }
}

/// Coerces to a float, accepting thousands separators in strings.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned = s.replace(',', "");
            LEADING_NUMBER
                .find(&cleaned)
                .and_then(|m| m.as_str().parse::<f64>().ok())
        }
        _ => None,
    }
}

/// Coerces yes/no style answers to a boolean.
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "si" | "sí" => Some(true),
            "false" | "no" | "n" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Coerces to a non-empty string.
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Coerces to a list of strings; a scalar becomes a one-element list.
pub fn coerce_string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.iter().filter_map(coerce_string).collect()),
        Value::Null => None,
        other => coerce_string(other).map(|s| vec![s]),
    }
}
