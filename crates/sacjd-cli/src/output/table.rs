use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{format_cell, schedule_periods, SCHEDULE_COLUMNS};

/// Print the schedule, its summary, warnings and methodology as tables.
pub fn print_table(value: &Value) {
    let Some(periods) = schedule_periods(value) else {
        print_flat_object(value);
        return;
    };

    print_schedule(periods);

    if let Some(result) = value.get("result") {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for key in ["effective_rate", "capital_portion"] {
            if let Some(val) = result.get(key) {
                builder.push_record([key, &format_cell(val)]);
            }
        }
        if let Some(Value::Object(summary)) = result.get("summary") {
            for (key, val) in summary {
                builder.push_record([key.as_str(), &format_cell(val)]);
            }
        }
        println!("\n{}", Table::from(builder));
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_schedule(periods: &[Value]) {
    if periods.is_empty() {
        println!("(empty schedule)");
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(SCHEDULE_COLUMNS.iter().map(|(_, header)| header.to_string()));
    for period in periods {
        builder.push_record(
            SCHEDULE_COLUMNS
                .iter()
                .map(|(field, _)| period.get(*field).map(format_cell).unwrap_or_default()),
        );
    }
    println!("{}", Table::from(builder));
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_cell(val)]);
        }
        println!("{}", Table::from(builder));
    } else {
        println!("{}", format_cell(value));
    }
}
