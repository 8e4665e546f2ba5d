use serde_json::Value;
use std::io::{self, Read};

/// Read piped stdin as JSON, or YAML when it does not parse as JSON.
/// Returns None when stdin is a terminal or empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(_) => serde_yaml::from_str(trimmed)?,
    };
    Ok(Some(value))
}
