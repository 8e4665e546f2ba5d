use serde_json::Value;

/// Print just the headline figure of the output.
///
/// Looks for well-known fields in priority order inside the `result`
/// envelope (or the bare object), then falls back to the first field. Row
/// lists print their first row's headline.
pub fn print_minimal(value: &Value) {
    let target = match value {
        Value::Array(rows) => rows.first().unwrap_or(value),
        _ => value,
    };
    let result_obj = target
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(target);

    let priority_keys = [
        "recommendation",
        "scenario",
        "status",
        "maxBuildingArea",
        "value",
        "preset",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        // Capacity and setback envelopes nest their headline one level down.
        for (section, key) in [("capacity", "maxBuildingArea"), ("compliance", "status")] {
            if let Some(val) = map.get(section).and_then(|s| s.get(key)) {
                println!("{}", format_minimal(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
