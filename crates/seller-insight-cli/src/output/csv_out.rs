use serde_json::Value;
use std::io;

use super::unwrap_result;

/// Write output as CSV to stdout. Seller reports become one row per
/// compared metric; lists become one row per item.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = unwrap_result(value);
    if let Value::Array(items) = result {
        write_array_csv(&mut wtr, items);
    } else if let Some(Value::Array(reports)) = result.get("reports") {
        let _ = wtr.write_record(RELATIVE_HEADERS);
        for r in reports {
            write_relative_rows(&mut wtr, unwrap_result(r));
        }
    } else if result.get("relative").is_some() {
        let _ = wtr.write_record(RELATIVE_HEADERS);
        write_relative_rows(&mut wtr, result);
    } else if let Value::Object(map) = result {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in map {
            let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
        }
    } else {
        let _ = wtr.write_record([&format_csv_value(result)]);
    }

    let _ = wtr.flush();
}

const RELATIVE_HEADERS: [&str; 8] = [
    "seller_id",
    "metric",
    "seller_value",
    "peer_value",
    "ratio",
    "polarity",
    "tier",
    "grade",
];

fn write_relative_rows<W: io::Write>(wtr: &mut csv::Writer<W>, report: &Value) {
    let seller = report.get("seller_id").map(format_csv_value).unwrap_or_default();
    if let Some(Value::Object(relative)) = report.get("relative") {
        for (metric, m) in relative {
            let field = |k: &str| m.get(k).map(format_csv_value).unwrap_or_default();
            let _ = wtr.write_record([
                seller.clone(),
                metric.clone(),
                field("seller_value"),
                field("peer_value"),
                field("ratio"),
                field("polarity"),
                field("tier"),
                field("grade"),
            ]);
        }
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

/// Full precision, unlike the human-facing formats.
fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
