use serde_json::Value;
use std::io;

use super::{format_cell, schedule_periods, SCHEDULE_COLUMNS};

/// Write the schedule as CSV to stdout, one row per period.
///
/// Values that are not a schedule envelope are written as field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Some(periods) = schedule_periods(value) {
        let headers: Vec<&str> = SCHEDULE_COLUMNS.iter().map(|(field, _)| *field).collect();
        let _ = wtr.write_record(&headers);
        for period in periods {
            let row: Vec<String> = headers
                .iter()
                .map(|h| period.get(*h).map(format_cell).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    } else if let Value::Object(map) = value {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in map {
            let _ = wtr.write_record([key.as_str(), &format_cell(val)]);
        }
    } else {
        let _ = wtr.write_record([&format_cell(value)]);
    }

    let _ = wtr.flush();
}
