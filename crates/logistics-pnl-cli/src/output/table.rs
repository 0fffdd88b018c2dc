use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten_fields, format_cell};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => print_result(result, map),
            None => print_fields(value),
        },
        Value::Array(arr) => print_rows(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value, envelope: &Map<String, Value>) {
    if let Some(matrix) = result.get("matrix") {
        print_grid(result, matrix);
    } else {
        print_fields(result);
        // Row collections (sweep points, cost-line variances) get their own table.
        let mut fields = Vec::new();
        flatten_fields("", result, &mut fields);
        for (key, val) in fields {
            if let Value::Array(rows) = val {
                if rows.first().map(Value::is_object).unwrap_or(false) {
                    println!("\n{}:", key);
                    print_rows(&rows);
                }
            }
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(value: &Value) {
    let mut fields = Vec::new();
    flatten_fields("", value, &mut fields);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in &fields {
        if matches!(val, Value::Array(rows) if rows.first().map(Value::is_object).unwrap_or(false))
        {
            continue;
        }
        builder.push_record([key.clone(), format_cell(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            println!("{}", format_cell(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(h).map(format_cell).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}

/// Two-way sensitivity grid: row lever down the side, column lever across.
fn print_grid(result: &Value, matrix: &Value) {
    let row_values = result.get("rowValues").and_then(Value::as_array);
    let column_values = result.get("columnValues").and_then(Value::as_array);
    let (Some(row_values), Some(column_values), Some(rows)) =
        (row_values, column_values, matrix.as_array())
    else {
        print_fields(result);
        return;
    };

    let corner = format!(
        "{} \\ {}",
        result.get("rowLever").map(format_cell).unwrap_or_default(),
        result.get("columnLever").map(format_cell).unwrap_or_default()
    );
    let mut header = vec![corner];
    header.extend(column_values.iter().map(format_cell));

    let mut builder = Builder::default();
    builder.push_record(header);
    for (row_value, row) in row_values.iter().zip(rows) {
        let mut record = vec![format_cell(row_value)];
        if let Some(cells) = row.as_array() {
            record.extend(cells.iter().map(format_cell));
        }
        builder.push_record(record);
    }
    if let Some(metric) = result.get("metric") {
        println!("Metric: {}", format_cell(metric));
    }
    println!("{}", Table::from(builder));
}
