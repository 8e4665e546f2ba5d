use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Print output as a table. Row lists (KPIs, scenarios, presets) become one
/// row per item; objects become a Field/Value table with nested sections
/// flattened to dotted keys, followed by any warnings and the methodology.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => print_envelope(result, map),
            None => print_fields(value),
        },
        Value::Array(rows) => print_rows(rows),
        _ => println!("{}", value),
    }
}

fn print_envelope(result: &Value, envelope: &Map<String, Value>) {
    print_fields(result);

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }
    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}

fn print_fields(value: &Value) {
    let mut fields = Vec::new();
    flatten("", value, &mut fields);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in fields {
        builder.push_record([key, val]);
    }
    println!("{}", Table::from(builder));
}

/// Collect `(dotted.key, display)` pairs. Arrays of objects stay as JSON.
fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, val, out);
            }
        }
        other => out.push((prefix.to_string(), format_value(other))),
    }
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        if rows.is_empty() {
            println!("(empty)");
        }
        for item in rows {
            println!("{}", format_value(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for map in rows.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(items) if items.iter().all(|v| !v.is_object()) => items
            .iter()
            .map(format_value)
            .collect::<Vec<_>>()
            .join(", "),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
