use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Map, Value};

/// Render a field for human display: `*_percent` as `6.19%`, whole-number
/// counters unchanged, everything else as money with two decimals.
pub fn format_field(key: &str, value: &Value) -> String {
    match value {
        Value::Number(n) => {
            if n.is_u64() || n.is_i64() {
                if key.ends_with("_percent") {
                    return format!("{n}%");
                }
                return n.to_string();
            }
            match n.as_f64().and_then(round_cents) {
                Some(d) if key.ends_with("_percent") => format!("{d:.2}%"),
                Some(d) => format!("{d:.2}"),
                None => n.to_string(),
            }
        }
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "n/a".to_string(),
        Value::Array(arr) => arr
            .iter()
            .map(|v| format_field(key, v))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Round half away from zero to two decimal places.
pub fn round_cents(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Scalar fields of an object, with nested objects expanded one level as
/// `parent.child`. Arrays are left to the caller.
pub fn flatten_scalars(map: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut rows = Vec::new();
    for (key, val) in map {
        match val {
            Value::Object(inner) => {
                for (child, v) in inner {
                    rows.push((format!("{key}.{child}"), v.clone()));
                }
            }
            Value::Array(_) => {}
            _ => rows.push((key.clone(), val.clone())),
        }
    }
    rows
}
