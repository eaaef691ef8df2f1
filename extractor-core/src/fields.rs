//! Lenient field access over loosely structured listing JSON.
//!
//! Reddit payloads omit fields, send `null`, or change a field's type between
//! objects (`edited` is `false` or a timestamp, `replies` is `""` or a
//! listing). These helpers never fail: a missing or unusable value falls back
//! to the type's empty default.

use serde_json::Value;

/// String view of `obj[key]`. Numbers and booleans are stringified, anything
/// else (including `null`) becomes `""`.
pub fn str_field(obj: &Value, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Integer view of `obj[key]`. Floats are truncated toward zero and numeric
/// strings are parsed.
pub fn int_field(obj: &Value, key: &str) -> i64 {
    match obj.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(0)
        }
        Some(Value::Bool(b)) => i64::from(*b),
        _ => 0,
    }
}

pub fn float_field(obj: &Value, key: &str) -> f64 {
    match obj.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}

/// JSON truthiness: `true`, non-zero numbers, non-empty strings, arrays
/// and objects.
pub fn bool_field(obj: &Value, key: &str) -> bool {
    match obj.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
        _ => false,
    }
}

/// `listing.data.children`, or an empty slice when any link is missing.
pub fn children_of(listing: &Value) -> &[Value] {
    listing
        .get("data")
        .and_then(|data| data.get("children"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// The `data` object of a listing child, or `Value::Null`.
pub fn data_of(item: &Value) -> &Value {
    item.get("data").unwrap_or(&Value::Null)
}
