use rust_decimal::Decimal;

use super::catalog::{MetricKey, MetricVector};
use super::safe_ratio;
use crate::ingest::CanonicalRecord;

/// Order count, revenue, AOV and units.
pub fn calculate_sales_metrics(records: &[&CanonicalRecord], out: &mut MetricVector) {
    if records.is_empty() {
        return;
    }

    let orders = Decimal::from(records.len() as u64);
    let revenue: Decimal = records.iter().map(|r| r.amount).sum();
    let quantity: Decimal = records.iter().map(|r| r.quantity).sum();

    out.set(MetricKey::TotalOrders, Some(orders));
    out.set(MetricKey::TotalRevenue, Some(revenue));
    out.set(MetricKey::AvgOrderValue, safe_ratio(revenue, orders));
    out.set(MetricKey::TotalQuantity, Some(quantity));
}
