use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::BenchmarkConfig;
use crate::ingest::CanonicalRecord;
use crate::metrics::safe_ratio;
use crate::types::{Money, Rate, Ratio};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Channel,
    Region,
    Product,
}

impl Dimension {
    fn key<'a>(&self, record: &'a CanonicalRecord) -> Option<&'a str> {
        match self {
            Dimension::Channel => record.channel.as_deref(),
            Dimension::Region => record.region.as_deref(),
            Dimension::Product => record.item_name.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentStats {
    pub orders: usize,
    pub revenue: Money,
    pub quantity: Decimal,
    pub avg_order_value: Option<Money>,
    pub cancel_rate: Option<Rate>,
    /// Share of the owner's total revenue carried by this segment
    pub revenue_share: Option<Rate>,
}

/// One channel, region or product: seller figures next to the pool's figures for the
/// same segment. Pool orders and revenue are per active seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentComparison {
    pub segment: String,
    pub seller: SegmentStats,
    pub pool: Option<SegmentStats>,
    pub pool_sellers: usize,
    pub orders_ratio: Option<Ratio>,
    pub revenue_ratio: Option<Ratio>,
    pub aov_ratio: Option<Ratio>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionBreakdown {
    pub dimension: Dimension,
    /// Largest seller revenue first
    pub segments: Vec<SegmentComparison>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Break the seller's orders down by `dimension` and compare each segment
/// to the same segment in the pool. Segments the seller never sold in are
/// left out. `None` when no seller record carries the dimension. Products
/// are cut to the `top_products` best sellers by revenue.
pub fn dimension_breakdown(
    dimension: Dimension,
    seller: &[&CanonicalRecord],
    pool: &[&CanonicalRecord],
    config: &BenchmarkConfig,
) -> Option<DimensionBreakdown> {
    let seller_groups = group(dimension, seller);
    if seller_groups.is_empty() {
        return None;
    }
    let pool_groups = group(dimension, pool);
    let seller_total: Money = seller.iter().map(|r| r.amount).sum();
    let pool_total: Money = pool.iter().map(|r| r.amount).sum();

    let mut segments: Vec<SegmentComparison> = seller_groups
        .iter()
        .map(|(segment, records)| {
            let stats = segment_stats(records, seller_total, config);
            let pool_records = pool_groups.get(segment);
            let pool_sellers = pool_records.map(|r| active_sellers(r)).unwrap_or(0);
            let pool_stats = pool_records.map(|r| segment_stats(r, pool_total, config));

            let (orders_ratio, revenue_ratio, aov_ratio) = match &pool_stats {
                Some(p) => {
                    let n = Decimal::from(pool_sellers.max(1) as u64);
                    (
                        safe_ratio(Decimal::from(stats.orders as u64) * n, Decimal::from(p.orders as u64)),
                        safe_ratio(stats.revenue * n, p.revenue),
                        match (stats.avg_order_value, p.avg_order_value) {
                            (Some(s), Some(p)) => safe_ratio(s, p),
                            _ => None,
                        },
                    )
                }
                None => (None, None, None),
            };
            let pool_stats = pool_stats.map(|p| per_seller(p, pool_sellers.max(1)));

            SegmentComparison {
                segment: segment.to_string(),
                seller: stats,
                pool: pool_stats,
                pool_sellers,
                orders_ratio,
                revenue_ratio,
                aov_ratio,
            }
        })
        .collect();
    segments.sort_by(|a, b| b.seller.revenue.cmp(&a.seller.revenue));
    if dimension == Dimension::Product {
        segments.truncate(config.top_products);
    }

    Some(DimensionBreakdown { dimension, segments })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn group<'a>(
    dimension: Dimension,
    records: &[&'a CanonicalRecord],
) -> BTreeMap<&'a str, Vec<&'a CanonicalRecord>> {
    let mut groups: BTreeMap<&str, Vec<&CanonicalRecord>> = BTreeMap::new();
    for r in records {
        if let Some(key) = dimension.key(r) {
            groups.entry(key).or_default().push(*r);
        }
    }
    groups
}

fn segment_stats(records: &[&CanonicalRecord], owner_total: Money, config: &BenchmarkConfig) -> SegmentStats {
    let orders = records.len();
    let revenue: Money = records.iter().map(|r| r.amount).sum();
    let quantity: Decimal = records.iter().map(|r| r.quantity).sum();
    let with_status = records.iter().filter(|r| r.status.is_some()).count();
    let cancelled = records
        .iter()
        .filter(|r| r.status.as_deref() == Some(config.status_labels.cancelled.as_str()))
        .count();

    SegmentStats {
        orders,
        revenue,
        quantity,
        avg_order_value: safe_ratio(revenue, Decimal::from(orders as u64)),
        cancel_rate: safe_ratio(Decimal::from(cancelled as u64), Decimal::from(with_status as u64)),
        revenue_share: safe_ratio(revenue, owner_total),
    }
}

/// Scale pool totals down to a single average seller, for display. AOV,
/// rates and shares are already size-independent.
fn per_seller(stats: SegmentStats, sellers: usize) -> SegmentStats {
    let n = Decimal::from(sellers as u64);
    SegmentStats {
        orders: stats.orders / sellers,
        revenue: stats.revenue / n,
        quantity: stats.quantity / n,
        ..stats
    }
}

pub(crate) fn active_sellers(records: &[&CanonicalRecord]) -> usize {
    records
        .iter()
        .filter_map(|r| r.seller_id.as_deref())
        .collect::<BTreeSet<_>>()
        .len()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
