pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Render a scalar for human-facing formats. Fractional decimals arrive as
/// strings and are cut to four places; integer-looking ids stay untouched.
pub(crate) fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) if s.contains('.') => match Decimal::from_str(s) {
            Ok(d) => d.round_dp(4).normalize().to_string(),
            Err(_) => s.clone(),
        },
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// The report inside a `ComputationOutput` envelope, or the value itself.
pub(crate) fn unwrap_result(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_scalar_rounds_decimal_strings() {
        assert_eq!(format_scalar(&json!("1.500000")), "1.5");
        assert_eq!(format_scalar(&json!("0.083333333")), "0.0833");
        assert_eq!(format_scalar(&json!("패션의류")), "패션의류");
        assert_eq!(format_scalar(&Value::Null), "-");
        assert_eq!(format_scalar(&json!("00123")), "00123");
    }

    #[test]
    fn test_unwrap_result() {
        let v = json!({"result": {"seller_id": "a"}, "warnings": []});
        assert_eq!(unwrap_result(&v), &json!({"seller_id": "a"}));
        assert_eq!(unwrap_result(&json!([1])), &json!([1]));
    }
}
