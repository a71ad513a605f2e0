//! Defensive readers for EXPLAIN attributes
//!
//! Engines emit numbers as JSON numbers or as strings (MySQL's `cost_info`),
//! and any field may be missing. Parsers read every metric through these
//! helpers so a bad value degrades to a default instead of an error.

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Reads a non-negative, finite number. Numeric strings are accepted.
fn finite_non_negative(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (number.is_finite() && number >= 0.0).then_some(number)
}

/// Cost value, 0 when absent or malformed
pub fn cost_or_default(value: Option<&Value>) -> f64 {
    finite_non_negative(value).unwrap_or(0.0)
}

/// Row count, 0 when absent or malformed. Fractional estimates are rounded.
pub fn rows_or_default(value: Option<&Value>) -> u64 {
    optional_rows(value).unwrap_or(0)
}

/// Row count that is only meaningful when present (ANALYZE output)
pub fn optional_rows(value: Option<&Value>) -> Option<u64> {
    if let Some(rows) = value.and_then(Value::as_u64) {
        return Some(rows);
    }
    finite_non_negative(value).map(|v| v.round() as u64)
}

/// Duration in milliseconds that is only meaningful when present
pub fn optional_millis(value: Option<&Value>) -> Option<f64> {
    finite_non_negative(value)
}

/// Non-empty string attribute
pub fn text(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Copies the attributes of `obj` except the keys in `skip`
pub fn details_from(obj: &Map<String, Value>, skip: &[&str]) -> IndexMap<String, Value> {
    obj.iter()
        .filter(|(key, _)| !skip.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
