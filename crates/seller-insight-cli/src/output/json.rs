use serde_json::Value;
use std::io::{self, Write};

/// Pretty-print JSON to stdout. A closed pipe (`| head`) is not an error.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "{}", s);
        }
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}
