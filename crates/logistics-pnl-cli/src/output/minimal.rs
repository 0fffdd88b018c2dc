use serde_json::Value;

use super::format_cell;

/// Fields printed by `--output minimal`, most specific first.
const PRIORITY_KEYS: [&str; 8] = [
    "text",
    "prompt",
    "ebitda",
    "ebitdaMargin",
    "netIncome",
    "valuation",
    "points",
    "matrix",
];

/// Print just the headline figure of a result.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Comparisons nest the statement under "projected".
    let headline = result_obj
        .get("comparison")
        .and(result_obj.get("projected"))
        .unwrap_or(result_obj);

    if let Value::Object(map) = headline {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key) {
                if !val.is_null() {
                    println!("{}", format_cell(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_cell(val));
            return;
        }
    }

    println!("{}", format_cell(headline));
}
