use serde_json::Value;

use super::{format_scalar, unwrap_result};

/// Print just the key answer from the output.
///
/// Seller reports print `<seller> <grade> (<score>)`; lists print one seller
/// id per line; anything else falls back to the first field.
pub fn print_minimal(value: &Value) {
    let result = unwrap_result(value);

    if let Value::Array(items) = result {
        for item in items {
            match item.get("seller_id") {
                Some(id) => println!("{}", format_scalar(id)),
                None => println!("{}", format_scalar(item)),
            }
        }
        return;
    }

    if let Some(Value::Array(reports)) = result.get("reports") {
        for r in reports {
            let r = unwrap_result(r);
            println!("{}", summary_line(r));
        }
        return;
    }

    if result.get("seller_id").is_some() {
        println!("{}", summary_line(result));
        return;
    }

    if let Value::Object(map) = result {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val));
            return;
        }
    }
    println!("{}", format_scalar(result));
}

fn summary_line(report: &Value) -> String {
    let id = report.get("seller_id").map(format_scalar).unwrap_or_default();
    // batch index rows carry grade/score at the top level
    let card = report.get("scorecard").filter(|c| !c.is_null()).unwrap_or(report);
    match (card.get("grade"), card.get("score")) {
        (Some(grade), Some(score)) if !grade.is_null() => {
            format!("{} {} ({})", id, format_scalar(grade), format_scalar(score))
        }
        _ => id,
    }
}
