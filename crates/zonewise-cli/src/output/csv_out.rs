use serde_json::Value;
use std::io;

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout: row lists as one row per item, objects
/// and computation envelopes as `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let fields = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in fields {
                let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
            }
        }
        Value::Array(rows) => write_rows(&mut wtr, rows),
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut StdoutWriter<'_>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);
    for map in rows.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
