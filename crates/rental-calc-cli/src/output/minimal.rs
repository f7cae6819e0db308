use serde_json::Value;

use super::format::format_field;

/// Key answer fields, in priority order.
const PRIORITY_KEYS: [&str; 3] = ["cash_flow_monthly", "monthly_payment", "monthly_mortgage"];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in priority order, then falls back to
/// the first field. A schedule prints its closing row.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result_obj {
        Value::Object(map) => {
            for key in PRIORITY_KEYS {
                if let Some(val) = map.get(key) {
                    if !val.is_null() {
                        println!("{}", format_field(key, val));
                        return;
                    }
                }
            }

            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, format_field(key, val));
            }
        }
        Value::Array(rows) => match rows.last() {
            Some(Value::Object(last)) => {
                let month = last.get("month").map(|m| format_field("month", m));
                let balance = last.get("balance").map(|b| format_field("balance", b));
                println!(
                    "month {}: balance {}",
                    month.unwrap_or_default(),
                    balance.unwrap_or_default()
                );
            }
            _ => println!("(empty)"),
        },
        other => println!("{}", format_field("", other)),
    }
}
