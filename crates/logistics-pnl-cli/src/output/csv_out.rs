use serde_json::Value;
use std::io;

use super::{flatten_fields, format_cell};

type CsvWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(Value::Array(points)) = result.get("points") {
        write_rows(&mut wtr, points);
    } else if let Some(matrix) = result.get("matrix") {
        write_grid(&mut wtr, result, matrix);
    } else if let Value::Array(arr) = result {
        write_rows(&mut wtr, arr);
    } else {
        let mut fields = Vec::new();
        flatten_fields("", result, &mut fields);
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in &fields {
            let _ = wtr.write_record([key.as_str(), &format_cell(val)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut CsvWriter<'_>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&format_cell(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(format_cell).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}

fn write_grid(wtr: &mut CsvWriter<'_>, result: &Value, matrix: &Value) {
    let empty = Vec::new();
    let row_values = result
        .get("rowValues")
        .and_then(Value::as_array)
        .unwrap_or(&empty);
    let column_values = result
        .get("columnValues")
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    let mut header = vec![result.get("rowLever").map(format_cell).unwrap_or_default()];
    header.extend(column_values.iter().map(format_cell));
    let _ = wtr.write_record(&header);

    for (row_value, row) in row_values.iter().zip(matrix.as_array().unwrap_or(&empty)) {
        let mut record = vec![format_cell(row_value)];
        if let Some(cells) = row.as_array() {
            record.extend(cells.iter().map(format_cell));
        }
        let _ = wtr.write_record(&record);
    }
}
