//! Metric catalog and the extractors that fill it.

pub mod catalog;
pub mod customer;
pub mod operational;
pub mod sales;

pub use catalog::{MetricGroup, MetricKey, MetricVector, Polarity};

use rust_decimal::Decimal;

use crate::config::BenchmarkConfig;
use crate::ingest::CanonicalRecord;

/// Compute every catalog metric over a set of records.
pub fn compute_metric_vector(records: &[&CanonicalRecord], config: &BenchmarkConfig) -> MetricVector {
    let mut vector = MetricVector::empty();
    sales::calculate_sales_metrics(records, &mut vector);
    customer::calculate_customer_metrics(records, &mut vector);
    operational::calculate_operational_metrics(records, config, &mut vector);
    vector
}

/// `numerator / denominator`, absent on a zero denominator.
pub(crate) fn safe_ratio(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Arithmetic mean, absent for an empty slice.
pub(crate) fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum: Decimal = values.iter().copied().sum();
    Some(sum / Decimal::from(values.len() as u64))
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal::Decimal;

    use crate::ingest::CanonicalRecord;

    pub fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    /// Order paid at 10:00 on the given August 2025 day.
    pub fn order(day: u32, amount: Decimal) -> CanonicalRecord {
        CanonicalRecord::new(at(day, 10), amount)
    }
}
