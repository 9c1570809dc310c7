use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Seller value divided by peer value (1.0 = on par with peers)
pub type Ratio = Decimal;

/// Durations expressed in fractional days
pub type Days = Decimal;

/// First and last payment timestamp covered by a set of records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Period {
    /// Smallest period containing every timestamp, `None` when empty.
    pub fn spanning<I>(timestamps: I) -> Option<Period>
    where
        I: IntoIterator<Item = NaiveDateTime>,
    {
        let mut iter = timestamps.into_iter();
        let first = iter.next()?;
        let (start, end) = iter.fold((first, first), |(lo, hi), ts| (lo.min(ts), hi.max(ts)));
        Some(Period { start, end })
    }

    /// `YYYY-MM-DD ~ YYYY-MM-DD`
    pub fn label(&self) -> String {
        format!(
            "{} ~ {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_period_spanning() {
        let period = Period::spanning(vec![at(12, 9), at(3, 10), at(18, 23)]).unwrap();
        assert_eq!(period.start, at(3, 10));
        assert_eq!(period.end, at(18, 23));
        assert_eq!(period.label(), "2025-08-03 ~ 2025-08-18");
    }

    #[test]
    fn test_period_empty() {
        assert!(Period::spanning(Vec::new()).is_none());
    }
}
