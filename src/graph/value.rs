use serde_json::{Number, Value};

/// Converts a raw argument string into the JSON value written into the graph.
///
/// The value already stored at the target decides the type: numbers stay
/// numbers, booleans stay booleans and strings stay strings. Without an
/// existing value (or with `null`) the type is inferred from the text.
/// Text that does not parse as the required type is written as a string.
pub fn coerce_value(raw: &str, existing: Option<&Value>) -> Value {
    match existing {
        Some(Value::String(_)) => Value::String(raw.to_string()),
        Some(Value::Number(_)) => parse_number(raw).unwrap_or_else(|| Value::String(raw.to_string())),
        Some(Value::Bool(_)) => parse_bool(raw).unwrap_or_else(|| Value::String(raw.to_string())),
        Some(Value::Array(_)) | Some(Value::Object(_)) => {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
        }
        Some(Value::Null) | None => infer_value(raw),
    }
}

fn infer_value(raw: &str) -> Value {
    parse_number(raw)
        .or_else(|| parse_bool(raw))
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

fn parse_number(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    if let Ok(int) = raw.parse::<i64>() {
        return Some(Value::Number(int.into()));
    }
    if let Ok(uint) = raw.parse::<u64>() {
        return Some(Value::Number(uint.into()));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

fn parse_bool(raw: &str) -> Option<Value> {
    match raw.trim().to_lowercase().as_str() {
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        _ => None,
    }
}
