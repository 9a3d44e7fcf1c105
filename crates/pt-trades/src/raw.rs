//! Defensive coercion helpers for raw exchange records.
//!
//! Exchange payloads encode numbers as JSON strings (`"30000.5"`), native
//! numbers, empty strings, or `null`, sometimes all within one endpoint. These
//! helpers collapse every such variation into a plain value without ever
//! failing: unusable input becomes `0.0`, `0`, an empty string, or `None`.

use serde_json::{Map, Value};

/// Parse a JSON value (string or number) as `f64`.
///
/// Non-finite results (`"NaN"`, `"inf"`) are rejected.
#[inline]
pub fn parse_str_f64(v: Option<&Value>) -> Option<f64> {
    let v = v?;
    let parsed = if let Some(s) = v.as_str() {
        fast_float2::parse(s.trim()).ok()
    } else {
        v.as_f64()
    }?;
    parsed.is_finite().then_some(parsed)
}

/// Parse a JSON value (string or number) as `i64`.
///
/// Fractional numbers are truncated, so `1700000000000.0` still reads as a
/// millisecond timestamp.
#[inline]
pub fn parse_str_i64(v: Option<&Value>) -> Option<i64> {
    let v = v?;
    if let Some(s) = v.as_str() {
        let s = s.trim();
        s.parse().ok().or_else(|| {
            fast_float2::parse::<f64, _>(s)
                .ok()
                .filter(|f| f.is_finite())
                .map(|f| f as i64)
        })
    } else {
        v.as_i64().or_else(|| v.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
    }
}

/// Named field as `f64`, defaulting to `0.0` when missing or unparseable.
#[inline]
pub fn f64_or_zero(v: &Value, key: &str) -> f64 {
    parse_str_f64(v.get(key)).unwrap_or(0.0)
}

/// First field in `keys` holding a non-zero number, else `0.0`.
pub fn first_nonzero_f64(v: &Value, keys: &[&str]) -> f64 {
    keys.iter()
        .map(|k| f64_or_zero(v, k))
        .find(|x| *x != 0.0)
        .unwrap_or(0.0)
}

/// First field in `keys` holding a positive epoch timestamp, else `0`.
pub fn first_timestamp(v: &Value, keys: &[&str]) -> i64 {
    keys.iter()
        .filter_map(|k| parse_str_i64(v.get(*k)))
        .find(|ts| *ts > 0)
        .unwrap_or(0)
}

/// Clamp to the non-negative range used by quantities and prices.
#[inline]
pub fn non_negative(x: f64) -> f64 {
    if x.is_finite() && x > 0.0 { x } else { 0.0 }
}

/// Sign of a fee amount as `-1`, `0` or `1`.
#[inline]
pub fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// Named field as a non-empty string.
///
/// Numeric IDs are rendered with their JSON text; `null`, objects, arrays and
/// empty strings yield `None`.
pub fn opt_str(v: &Value, key: &str) -> Option<String> {
    match v.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Named field as a string, empty when absent.
#[inline]
pub fn str_or_empty(v: &Value, key: &str) -> String {
    opt_str(v, key).unwrap_or_default()
}

/// Treat a value as a key-value mapping only if it really is a JSON object.
#[inline]
pub fn as_mapping(v: Option<&Value>) -> Option<&Map<String, Value>> {
    v.and_then(Value::as_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn floats_from_strings_numbers_and_junk() {
        let v = json!({"a": "1.5", "b": 2.25, "c": "", "d": null, "e": "abc", "f": "NaN", "g": [1]});
        assert_eq!(f64_or_zero(&v, "a"), 1.5);
        assert_eq!(f64_or_zero(&v, "b"), 2.25);
        for k in ["c", "d", "e", "f", "g", "missing"] {
            assert_eq!(f64_or_zero(&v, k), 0.0, "key {k}");
        }
    }

    #[test]
    fn integers_accept_float_text() {
        assert_eq!(parse_str_i64(Some(&json!("1700000000000"))), Some(1_700_000_000_000));
        assert_eq!(parse_str_i64(Some(&json!(1700000000000.0))), Some(1_700_000_000_000));
        assert_eq!(parse_str_i64(Some(&json!("1.7e12"))), Some(1_700_000_000_000));
        assert_eq!(parse_str_i64(Some(&json!(true))), None);
    }

    #[test]
    fn first_nonzero_and_timestamp_priority() {
        let v = json!({"accFillSz": "0", "fillSz": "0.3", "cTime": "", "uTime": "1700000000001"});
        assert_eq!(first_nonzero_f64(&v, &["accFillSz", "fillSz"]), 0.3);
        assert_eq!(first_timestamp(&v, &["cTime", "uTime"]), 1_700_000_000_001);
        assert_eq!(first_timestamp(&v, &["nope"]), 0);
    }

    #[test]
    fn sign_and_clamp() {
        assert_eq!(sign(-0.025), -1);
        assert_eq!(sign(0.0), 0);
        assert_eq!(sign(0.5), 1);
        assert_eq!(non_negative(-3.0), 0.0);
        assert_eq!(non_negative(f64::INFINITY), 0.0);
        assert_eq!(non_negative(4.0), 4.0);
    }

    #[test]
    fn strings_and_mappings() {
        let v = json!({"id": 123, "s": "x", "e": "", "n": null, "m": {"cost": 1}, "l": [1]});
        assert_eq!(opt_str(&v, "id").as_deref(), Some("123"));
        assert_eq!(opt_str(&v, "s").as_deref(), Some("x"));
        assert_eq!(opt_str(&v, "e"), None);
        assert_eq!(opt_str(&v, "n"), None);
        assert_eq!(str_or_empty(&v, "missing"), "");
        assert!(as_mapping(v.get("m")).is_some());
        assert!(as_mapping(v.get("l")).is_none());
        assert!(as_mapping(v.get("n")).is_none());
        assert!(as_mapping(None).is_none());
    }
}
