use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Loose ordering between two values.
///
/// Numbers and numeric strings compare numerically, strings lexically, booleans as
/// 0/1. Anything else is unordered.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(sa), Value::String(sb)) => Some(sa.cmp(sb)),
        (Value::Number(na), Value::Number(nb)) => na.as_f64()?.partial_cmp(&nb.as_f64()?),
        (Value::Bool(ba), Value::Bool(bb)) => Some(ba.cmp(bb)),
        (Value::Number(na), Value::String(sb)) => {
            let db = sb.trim().parse::<f64>().ok()?;
            na.as_f64()?.partial_cmp(&db)
        }
        (Value::String(sa), Value::Number(nb)) => {
            let da = sa.trim().parse::<f64>().ok()?;
            da.partial_cmp(&nb.as_f64()?)
        }
        _ => None,
    }
}

pub fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

pub fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Text used when a value is interpolated into a message.
/// Strings appear without quotes and a missing value reads `undefined`.
pub fn render(v: Option<&Value>) -> String {
    match v {
        None => "undefined".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Integral results stay integers so `2 * 3` prints as `6`, not `6.0`.
pub fn number(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Value::from(f as i64)
    } else {
        Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
    }
}
