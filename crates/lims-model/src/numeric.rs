//! Permissive numeric coercion used at the decode boundary.

use serde_json::Value;

/// Coerce a raw JSON value to `f64`.
///
/// Numbers pass through; a literal too large for `f64` becomes infinite
/// instead of failing the decode. Strings are trimmed and parsed; empty or
/// unparsable text yields NaN. Every other kind of value yields NaN.
pub fn coerce_f64(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number
            .as_f64()
            .unwrap_or_else(|| parse_f64(&number.to_string())),
        Value::String(text) => parse_f64(text),
        _ => f64::NAN,
    }
}

/// Parse trimmed text as `f64`, yielding NaN when that fails.
pub fn parse_f64(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}
