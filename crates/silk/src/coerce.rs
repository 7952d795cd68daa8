//! Scalar coercion primitives.
//!
//! These never fail: a value that cannot be represented in the target type coerces to
//! that type's zero value.

use crate::value::Value;

/// Integers pass through, floats truncate toward zero, base-10 strings are parsed.
/// Anything else (including unparsable strings) is `0`.
pub fn to_int(value: &Value) -> i64 {
    match value {
        Value::Int(i) => *i,
        Value::Float(f) => *f as i64,
        Value::Text(s) => s.parse::<i64>().unwrap_or(0),
        Value::Null | Value::Bool(_) => 0,
    }
}

/// Floats pass through, base-10 strings are parsed. Anything else is `0.0`.
pub fn to_float(value: &Value) -> f64 {
    match value {
        Value::Float(f) => *f,
        Value::Text(s) => s.parse::<f64>().unwrap_or(0.0),
        Value::Null | Value::Bool(_) | Value::Int(_) => 0.0,
    }
}

/// Strings pass through; anything else is empty.
pub fn to_string(value: &Value) -> String {
    match value {
        Value::Text(s) => s.clone(),
        _ => String::new(),
    }
}

/// Booleans pass through, only the literal `"true"` is true, positive integers are true.
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Text(s) => s == "true",
        Value::Int(i) => *i > 0,
        Value::Null | Value::Float(_) => false,
    }
}
