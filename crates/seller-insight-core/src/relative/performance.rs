use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::tiers::{classify_tier, letter_grade, Grade, PerformanceTier};
use crate::config::BenchmarkConfig;
use crate::metrics::{MetricKey, MetricVector, Polarity};
use crate::types::Ratio;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Seller value against the peer baseline for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeMetric {
    pub seller_value: Decimal,
    pub peer_value: Decimal,
    /// seller / peer
    pub ratio: Ratio,
    pub polarity: Polarity,
    pub tier: PerformanceTier,
    pub grade: Grade,
}

/// Relative metrics keyed by catalog key. A key is missing when either side
/// is absent or the peer value is zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelativeMetricVector {
    entries: BTreeMap<MetricKey, RelativeMetric>,
}

impl RelativeMetricVector {
    pub fn get(&self, key: MetricKey) -> Option<&RelativeMetric> {
        self.entries.get(&key)
    }

    pub fn ratio(&self, key: MetricKey) -> Option<Ratio> {
        self.entries.get(&key).map(|m| m.ratio)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, &RelativeMetric)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys whose tier is below average, in catalog order.
    pub fn weaknesses(&self) -> Vec<MetricKey> {
        self.iter()
            .filter(|(_, m)| m.tier == PerformanceTier::BelowAverage)
            .map(|(k, _)| k)
            .collect()
    }

    /// Keys whose tier is excellent, in catalog order.
    pub fn strengths(&self) -> Vec<MetricKey> {
        self.iter()
            .filter(|(_, m)| m.tier == PerformanceTier::Excellent)
            .map(|(k, _)| k)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compare a seller's metric vector to the peer baseline.
pub fn compute_relative(
    seller: &MetricVector,
    baseline: &MetricVector,
    config: &BenchmarkConfig,
) -> RelativeMetricVector {
    let mut entries = BTreeMap::new();
    for key in MetricKey::ALL {
        let (Some(seller_value), Some(peer_value)) = (seller.get(key), baseline.get(key)) else {
            continue;
        };
        if peer_value.is_zero() {
            continue;
        }
        let ratio = seller_value / peer_value;
        let polarity = key.polarity();
        entries.insert(
            key,
            RelativeMetric {
                seller_value,
                peer_value,
                ratio,
                polarity,
                tier: classify_tier(ratio, polarity, &config.tiers),
                grade: letter_grade(ratio, polarity, &config.grades),
            },
        );
    }
    RelativeMetricVector { entries }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
