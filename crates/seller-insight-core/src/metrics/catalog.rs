use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Fixed catalog of seller KPIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    TotalOrders,
    TotalRevenue,
    AvgOrderValue,
    TotalQuantity,
    UniqueCustomers,
    RepeatCustomers,
    RepeatRate,
    AvgOrdersPerCustomer,
    CustomerLtv,
    CompletionRate,
    CancelRate,
    DelayRate,
    ReturnRate,
    ExchangeRate,
    AvgShipLeadtime,
    AvgDeliveryTime,
    SameDayShipRate,
}

/// Whether a larger value is better (direct) or worse (inverse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Direct,
    Inverse,
}

/// Which extractor family produces a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricGroup {
    Sales,
    Customer,
    Operational,
}

impl MetricKey {
    pub const ALL: [MetricKey; 17] = [
        MetricKey::TotalOrders,
        MetricKey::TotalRevenue,
        MetricKey::AvgOrderValue,
        MetricKey::TotalQuantity,
        MetricKey::UniqueCustomers,
        MetricKey::RepeatCustomers,
        MetricKey::RepeatRate,
        MetricKey::AvgOrdersPerCustomer,
        MetricKey::CustomerLtv,
        MetricKey::CompletionRate,
        MetricKey::CancelRate,
        MetricKey::DelayRate,
        MetricKey::ReturnRate,
        MetricKey::ExchangeRate,
        MetricKey::AvgShipLeadtime,
        MetricKey::AvgDeliveryTime,
        MetricKey::SameDayShipRate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MetricKey::TotalOrders => "total_orders",
            MetricKey::TotalRevenue => "total_revenue",
            MetricKey::AvgOrderValue => "avg_order_value",
            MetricKey::TotalQuantity => "total_quantity",
            MetricKey::UniqueCustomers => "unique_customers",
            MetricKey::RepeatCustomers => "repeat_customers",
            MetricKey::RepeatRate => "repeat_rate",
            MetricKey::AvgOrdersPerCustomer => "avg_orders_per_customer",
            MetricKey::CustomerLtv => "customer_ltv",
            MetricKey::CompletionRate => "completion_rate",
            MetricKey::CancelRate => "cancel_rate",
            MetricKey::DelayRate => "delay_rate",
            MetricKey::ReturnRate => "return_rate",
            MetricKey::ExchangeRate => "exchange_rate",
            MetricKey::AvgShipLeadtime => "avg_ship_leadtime",
            MetricKey::AvgDeliveryTime => "avg_delivery_time",
            MetricKey::SameDayShipRate => "same_day_ship_rate",
        }
    }

    pub fn from_name(name: &str) -> Option<MetricKey> {
        MetricKey::ALL.iter().copied().find(|k| k.name() == name)
    }

    pub fn polarity(&self) -> Polarity {
        match self {
            MetricKey::CancelRate
            | MetricKey::DelayRate
            | MetricKey::ReturnRate
            | MetricKey::AvgShipLeadtime
            | MetricKey::AvgDeliveryTime => Polarity::Inverse,
            _ => Polarity::Direct,
        }
    }

    pub fn group(&self) -> MetricGroup {
        match self {
            MetricKey::TotalOrders
            | MetricKey::TotalRevenue
            | MetricKey::AvgOrderValue
            | MetricKey::TotalQuantity => MetricGroup::Sales,
            MetricKey::UniqueCustomers
            | MetricKey::RepeatCustomers
            | MetricKey::RepeatRate
            | MetricKey::AvgOrdersPerCustomer
            | MetricKey::CustomerLtv => MetricGroup::Customer,
            _ => MetricGroup::Operational,
        }
    }
}

impl std::fmt::Display for MetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Value of every catalog metric for one seller, peer or pool.
///
/// Every key is always present in the map; `None` means the metric could
/// not be computed (empty denominator), which is different from zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricVector {
    values: BTreeMap<MetricKey, Option<Decimal>>,
}

impl Default for MetricVector {
    fn default() -> Self {
        MetricVector::empty()
    }
}

impl MetricVector {
    /// Vector with every metric absent.
    pub fn empty() -> Self {
        MetricVector {
            values: MetricKey::ALL.iter().map(|k| (*k, None)).collect(),
        }
    }

    pub fn get(&self, key: MetricKey) -> Option<Decimal> {
        self.values.get(&key).copied().flatten()
    }

    pub fn set(&mut self, key: MetricKey, value: Option<Decimal>) {
        self.values.insert(key, value);
    }

    /// Builder-style `set`, handy in fixtures.
    pub fn with(mut self, key: MetricKey, value: Decimal) -> Self {
        self.set(key, Some(value));
        self
    }

    /// Metrics with a value, in catalog order.
    pub fn present(&self) -> impl Iterator<Item = (MetricKey, Decimal)> + '_ {
        self.values.iter().filter_map(|(k, v)| v.map(|v| (*k, v)))
    }

    pub fn is_absent(&self, key: MetricKey) -> bool {
        self.get(key).is_none()
    }

    pub fn present_count(&self) -> usize {
        self.present().count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_inverse_polarity_table() {
        let inverse: Vec<MetricKey> = MetricKey::ALL
            .iter()
            .copied()
            .filter(|k| k.polarity() == Polarity::Inverse)
            .collect();
        assert_eq!(
            inverse,
            vec![
                MetricKey::CancelRate,
                MetricKey::DelayRate,
                MetricKey::ReturnRate,
                MetricKey::AvgShipLeadtime,
                MetricKey::AvgDeliveryTime,
            ]
        );
        assert_eq!(MetricKey::ExchangeRate.polarity(), Polarity::Direct);
        assert_eq!(MetricKey::SameDayShipRate.polarity(), Polarity::Direct);
    }

    #[test]
    fn test_names_round_trip_through_lookup() {
        for key in MetricKey::ALL {
            assert_eq!(MetricKey::from_name(key.name()), Some(key));
        }
        assert_eq!(MetricKey::from_name("total_revenue_vs_category"), None);
    }

    #[test]
    fn test_absent_differs_from_zero() {
        let v = MetricVector::empty().with(MetricKey::CancelRate, Decimal::ZERO);
        assert_eq!(v.get(MetricKey::CancelRate), Some(Decimal::ZERO));
        assert!(v.is_absent(MetricKey::RepeatRate));
        assert_eq!(v.present_count(), 1);
    }

    #[test]
    fn test_serializes_absent_as_null() {
        let v = MetricVector::empty().with(MetricKey::TotalOrders, dec!(3));
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["total_orders"], serde_json::json!("3"));
        assert!(json["repeat_rate"].is_null());
    }
}
