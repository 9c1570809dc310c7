use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{format_scalar, unwrap_result};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_report(result, map);
            } else if let Some(Value::Array(reports)) = map.get("reports") {
                print_batch(reports, map);
            } else {
                print_flat_object(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_report(result: &Value, envelope: &Map<String, Value>) {
    let Value::Object(report) = result else {
        print_flat_object(envelope);
        return;
    };

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for key in ["seller_id", "order_count", "category", "comparison"] {
        if let Some(val) = report.get(key) {
            builder.push_record([key, &format_scalar(val)]);
        }
    }
    if let Some(period) = report.get("period").filter(|p| !p.is_null()) {
        let start = period.get("start").map(format_scalar).unwrap_or_default();
        let end = period.get("end").map(format_scalar).unwrap_or_default();
        builder.push_record(["period", &format!("{} ~ {}", start, end)]);
    }
    println!("{}", Table::from(builder));

    match report.get("relative") {
        Some(Value::Object(relative)) if !relative.is_empty() => {
            println!("\n{}", relative_table(relative));
        }
        _ => {
            if let Some(Value::Object(metrics)) = report.get("metrics") {
                println!("\n{}", metrics_table(metrics));
            }
        }
    }

    if let Some(card) = report.get("scorecard").filter(|c| !c.is_null()) {
        println!(
            "\nOverall: {} ({})",
            card.get("grade").map(format_scalar).unwrap_or_default(),
            card.get("score").map(format_scalar).unwrap_or_default()
        );
    }

    for key in ["strengths", "weaknesses"] {
        if let Some(Value::Array(items)) = report.get(key) {
            if !items.is_empty() {
                let names: Vec<String> = items.iter().map(format_scalar).collect();
                println!("{}: {}", capitalize(key), names.join(", "));
            }
        }
    }
    if let Some(hour) = report
        .get("breakdowns")
        .and_then(|b| b.get("peak_hour"))
        .filter(|h| !h.is_null())
    {
        println!("Peak hour: {}h", format_scalar(hour));
    }

    print_footer(envelope);
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn print_batch(reports: &[Value], envelope: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Seller", "Category", "Basis", "Grade", "Score"]);
    for item in reports {
        let r = unwrap_result(item);
        let card = r.get("scorecard").filter(|c| !c.is_null()).unwrap_or(r);
        let basis = r
            .get("benchmark")
            .and_then(|b| b.get("basis"))
            .or_else(|| r.get("basis"));
        builder.push_record([
            cell(r.get("seller_id")),
            cell(r.get("category")),
            cell(basis),
            cell(card.get("grade")),
            cell(card.get("score")),
        ]);
    }
    println!("{}", Table::from(builder));

    if let Some(Value::Array(failures)) = envelope.get("failures") {
        if !failures.is_empty() {
            println!("\nFailures:");
            for f in failures {
                println!("  - {}: {}", cell(f.get("seller_id")), cell(f.get("error")));
            }
        }
    }
}

fn relative_table(relative: &Map<String, Value>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Metric", "Seller", "Peers", "Ratio", "Tier", "Grade"]);
    for (metric, m) in relative {
        builder.push_record([
            metric.clone(),
            cell(m.get("seller_value")),
            cell(m.get("peer_value")),
            cell(m.get("ratio")),
            cell(m.get("tier")),
            cell(m.get("grade")),
        ]);
    }
    Table::from(builder)
}

fn metrics_table(metrics: &Map<String, Value>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Metric", "Value"]);
    for (metric, val) in metrics {
        builder.push_record([metric.as_str(), &format_scalar(val)]);
    }
    Table::from(builder)
}

fn print_footer(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_scalar(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_scalar).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_scalar(item));
        }
    }
}

fn cell(value: Option<&Value>) -> String {
    value.map(format_scalar).unwrap_or_else(|| "-".to_string())
}
