use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::catalog::{MetricKey, MetricVector};
use super::{mean, safe_ratio};
use crate::config::BenchmarkConfig;
use crate::ingest::CanonicalRecord;
use crate::types::Days;

const SECONDS_PER_DAY: Decimal = dec!(86400);

/// Fractional days from `from` to `to`.
pub fn days_between(from: NaiveDateTime, to: NaiveDateTime) -> Days {
    Decimal::from((to - from).num_seconds()) / SECONDS_PER_DAY
}

/// Status rates plus shipping and delivery lead times.
pub fn calculate_operational_metrics(
    records: &[&CanonicalRecord],
    config: &BenchmarkConfig,
    out: &mut MetricVector,
) {
    if records.is_empty() {
        return;
    }
    calculate_status_rates(records, config, out);
    calculate_lead_times(records, config, out);
}

fn calculate_status_rates(
    records: &[&CanonicalRecord],
    config: &BenchmarkConfig,
    out: &mut MetricVector,
) {
    // no status information at all: rates are unknown, not zero
    if records.iter().all(|r| r.status.is_none()) {
        return;
    }

    let total = Decimal::from(records.len() as u64);
    let labels = &config.status_labels;
    let rate = |label: &str| {
        let hits = records
            .iter()
            .filter(|r| r.status.as_deref() == Some(label))
            .count();
        safe_ratio(Decimal::from(hits as u64), total)
    };

    out.set(MetricKey::CompletionRate, rate(&labels.completed));
    out.set(MetricKey::CancelRate, rate(&labels.cancelled));
    out.set(MetricKey::DelayRate, rate(&labels.delayed));
    out.set(MetricKey::ReturnRate, rate(&labels.returned));
    out.set(MetricKey::ExchangeRate, rate(&labels.exchanged));
}

fn calculate_lead_times(
    records: &[&CanonicalRecord],
    config: &BenchmarkConfig,
    out: &mut MetricVector,
) {
    let ship_lead_times: Vec<Days> = records
        .iter()
        .filter_map(|r| r.ship_date.map(|ship| days_between(r.timestamp, ship)))
        .collect();
    let delivery_times: Vec<Days> = records
        .iter()
        .filter_map(|r| match (r.ship_date, r.delivered_date) {
            (Some(ship), Some(delivered)) => Some(days_between(ship, delivered)),
            _ => None,
        })
        .collect();

    out.set(MetricKey::AvgShipLeadtime, mean(&ship_lead_times));
    out.set(MetricKey::AvgDeliveryTime, mean(&delivery_times));

    if !ship_lead_times.is_empty() {
        let same_day = ship_lead_times
            .iter()
            .filter(|d| **d <= config.same_day_ship_days)
            .count();
        out.set(
            MetricKey::SameDayShipRate,
            safe_ratio(
                Decimal::from(same_day as u64),
                Decimal::from(ship_lead_times.len() as u64),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::{at, order};

    fn shipped(day: u32, ship: Option<(u32, u32)>, delivered: Option<(u32, u32)>) -> CanonicalRecord {
        let mut r = order(day, dec!(10000));
        r.ship_date = ship.map(|(d, h)| at(d, h));
        r.delivered_date = delivered.map(|(d, h)| at(d, h));
        r
    }

    fn with_status(status: Option<&str>) -> CanonicalRecord {
        let mut r = order(1, dec!(1000));
        r.status = status.map(str::to_string);
        r
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(at(1, 10), at(2, 22)), dec!(1.5));
        assert_eq!(days_between(at(2, 10), at(2, 10)), Decimal::ZERO);
    }

    #[test]
    fn test_status_rates() {
        let records = vec![
            with_status(Some("배송완료")),
            with_status(Some("배송완료")),
            with_status(Some("결제취소")),
            with_status(None),
        ];
        let refs: Vec<&CanonicalRecord> = records.iter().collect();
        let mut v = MetricVector::empty();
        calculate_operational_metrics(&refs, &BenchmarkConfig::default(), &mut v);

        assert_eq!(v.get(MetricKey::CompletionRate), Some(dec!(0.5)));
        assert_eq!(v.get(MetricKey::CancelRate), Some(dec!(0.25)));
        assert_eq!(v.get(MetricKey::ReturnRate), Some(Decimal::ZERO));
    }

    #[test]
    fn test_missing_status_is_absent() {
        let records = vec![with_status(None), with_status(None)];
        let refs: Vec<&CanonicalRecord> = records.iter().collect();
        let mut v = MetricVector::empty();
        calculate_operational_metrics(&refs, &BenchmarkConfig::default(), &mut v);
        assert!(v.is_absent(MetricKey::CancelRate));
        assert!(v.is_absent(MetricKey::CompletionRate));
    }

    #[test]
    fn test_lead_times() {
        // order() pays at 10:00
        let records = vec![
            shipped(1, Some((1, 22)), Some((3, 22))), // 0.5d ship, 2d delivery
            shipped(1, Some((3, 10)), None),          // 2d ship
            shipped(1, None, Some((5, 10))),          // ignored everywhere
        ];
        let refs: Vec<&CanonicalRecord> = records.iter().collect();
        let mut v = MetricVector::empty();
        calculate_operational_metrics(&refs, &BenchmarkConfig::default(), &mut v);

        assert_eq!(v.get(MetricKey::AvgShipLeadtime), Some(dec!(1.25)));
        assert_eq!(v.get(MetricKey::AvgDeliveryTime), Some(dec!(2)));
        assert_eq!(v.get(MetricKey::SameDayShipRate), Some(dec!(0.5)));
    }

    #[test]
    fn test_no_ship_dates_is_absent() {
        let records = vec![shipped(1, None, None)];
        let refs: Vec<&CanonicalRecord> = records.iter().collect();
        let mut v = MetricVector::empty();
        calculate_operational_metrics(&refs, &BenchmarkConfig::default(), &mut v);
        assert!(v.is_absent(MetricKey::AvgShipLeadtime));
        assert!(v.is_absent(MetricKey::AvgDeliveryTime));
        assert!(v.is_absent(MetricKey::SameDayShipRate));
    }
}
