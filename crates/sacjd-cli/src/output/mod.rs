pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Schedule columns in display order: (JSON field, header).
pub const SCHEDULE_COLUMNS: [(&str, &str); 9] = [
    ("period_number", "Period"),
    ("period_kind", "Kind"),
    ("interest_accrued_before", "Accrued Before"),
    ("remaining_installments", "Divisor"),
    ("interest_portion", "Interest"),
    ("capital_portion", "Capital"),
    ("total_installment_value", "Installment"),
    ("interest_accrued_after", "Accrued After"),
    ("remaining_capital_after", "Capital Balance"),
];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The `periods` array of a schedule envelope, if present.
pub fn schedule_periods(value: &Value) -> Option<&Vec<Value>> {
    value.get("result")?.get("periods")?.as_array()
}

/// Render a scalar cell. Decimals arrive as strings already rounded.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
