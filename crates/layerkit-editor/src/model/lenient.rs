//! Lenient decoding for values that round-tripped through a dynamically
//! typed storage layer.
//!
//! Stored layer records carry historical quirks: booleans saved as `0`/`1`,
//! numbers saved as strings, enum fields holding strings no current version
//! writes. All of that is normalized here, once, at the model boundary, so
//! no consumer ever needs a truthiness check.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Boolean that defaults to `false` on anything unrecognizable.
pub(crate) fn bool_false<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(as_bool(&Value::deserialize(d)?).unwrap_or(false))
}

/// Boolean that defaults to `true` on anything unrecognizable.
pub(crate) fn bool_true<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(as_bool(&Value::deserialize(d)?).unwrap_or(true))
}

/// Number that defaults to `0.0`.
pub(crate) fn f64_zero<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(as_f64(&Value::deserialize(d)?).unwrap_or(0.0))
}

/// Number that defaults to `1.0`.
pub(crate) fn f64_one<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(as_f64(&Value::deserialize(d)?).unwrap_or(1.0))
}

/// Optional number; non-numeric input is treated as absent.
pub(crate) fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(as_f64(&Value::deserialize(d)?))
}

/// Non-negative integer (decimal-place counts); defaults to `0`.
pub(crate) fn u32_zero<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(as_f64(&Value::deserialize(d)?)
        .filter(|f| f.is_finite() && *f >= 0.0)
        .map(|f| f as u32)
        .unwrap_or(0))
}

/// String-keyed enum; unrecognized or non-string input falls back to the
/// enum's default variant.
pub(crate) fn enum_or_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    let value = Value::deserialize(d)?;
    Ok(value
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default())
}
