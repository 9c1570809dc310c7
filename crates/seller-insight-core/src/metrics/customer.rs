use rust_decimal::Decimal;
use std::collections::HashMap;

use super::catalog::{MetricKey, MetricVector};
use super::safe_ratio;
use crate::ingest::CanonicalRecord;

/// Customer counts, repeat behaviour and lifetime value.
///
/// Without a single customer key every customer metric stays absent: "we
/// cannot tell" is not the same as "nobody came back".
pub fn calculate_customer_metrics(records: &[&CanonicalRecord], out: &mut MetricVector) {
    let mut orders_per_customer: HashMap<&str, usize> = HashMap::new();
    for r in records {
        if let Some(key) = r.customer_key.as_deref() {
            *orders_per_customer.entry(key).or_default() += 1;
        }
    }
    if orders_per_customer.is_empty() {
        return;
    }

    let unique = Decimal::from(orders_per_customer.len() as u64);
    let repeat = Decimal::from(orders_per_customer.values().filter(|n| **n >= 2).count() as u64);
    let identified_orders = Decimal::from(orders_per_customer.values().sum::<usize>() as u64);
    let revenue: Decimal = records.iter().map(|r| r.amount).sum();

    out.set(MetricKey::UniqueCustomers, Some(unique));
    out.set(MetricKey::RepeatCustomers, Some(repeat));
    out.set(MetricKey::RepeatRate, safe_ratio(repeat, unique));
    out.set(
        MetricKey::AvgOrdersPerCustomer,
        safe_ratio(identified_orders, unique),
    );
    out.set(MetricKey::CustomerLtv, safe_ratio(revenue, unique));
}
