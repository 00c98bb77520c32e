use serde_json::Value;

use super::format_cell;

/// Print just the installment a borrower pays first.
///
/// Falls back to the first summary field, then to the raw value.
pub fn print_minimal(value: &Value) {
    let summary = value.get("result").and_then(|r| r.get("summary"));

    match summary {
        Some(Value::Object(map)) => {
            if let Some(first) = map.get("first_installment").filter(|v| !v.is_null()) {
                println!("{}", format_cell(first));
            } else if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, format_cell(val));
            }
        }
        _ => println!("{}", format_cell(value)),
    }
}
