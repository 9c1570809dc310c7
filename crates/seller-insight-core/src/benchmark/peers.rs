use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::config::BenchmarkConfig;
use crate::ingest::{CanonicalRecord, Dataset};
use crate::metrics::{compute_metric_vector, MetricKey, MetricVector};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which comparison pool a benchmark ended up using, narrowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkBasis {
    /// Mean over qualifying sellers in the category
    CategoryPeers,
    /// No seller qualified; the whole category treated as one pseudo-peer
    CategoryPool,
    /// Dataset has no categories; mean over qualifying sellers platform-wide
    PlatformPeers,
    /// Whole dataset treated as one pseudo-peer
    PlatformAverage,
}

impl std::fmt::Display for BenchmarkBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BenchmarkBasis::CategoryPeers => write!(f, "category peers"),
            BenchmarkBasis::CategoryPool => write!(f, "category pool"),
            BenchmarkBasis::PlatformPeers => write!(f, "platform peers"),
            BenchmarkBasis::PlatformAverage => write!(f, "platform average"),
        }
    }
}

/// A seller that passed the minimum-order filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerSummary {
    pub seller_id: String,
    pub orders: usize,
}

/// Spread of one metric across the qualifying peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDistribution {
    pub count: usize,
    pub mean: Decimal,
    pub median: Decimal,
    pub low: Decimal,
    pub high: Decimal,
    pub std_dev: Decimal,
}

/// Baseline metric vector for a category (or the platform) plus how it was
/// obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerBenchmark {
    pub basis: BenchmarkBasis,
    /// Category used; `None` means the platform average was used
    pub category: Option<String>,
    /// Sellers that contributed a metric vector of their own
    pub peer_count: usize,
    /// Distinct sellers in the comparison pool before the order filter
    pub pool_sellers: usize,
    pub pool_records: usize,
    pub min_peer_orders: usize,
    pub peers: Vec<PeerSummary>,
    pub baseline: MetricVector,
    /// Per-metric spread; empty unless the baseline is a peer average
    pub distribution: BTreeMap<MetricKey, MetricDistribution>,
}

impl PeerBenchmark {
    /// One-line disclosure of the comparison pool for report headers.
    pub fn describe(&self) -> String {
        match (&self.basis, &self.category) {
            (BenchmarkBasis::CategoryPeers, Some(cat)) => {
                format!("compared to {} peers in category {}", self.peer_count, cat)
            }
            (BenchmarkBasis::CategoryPool, Some(cat)) => format!(
                "no seller in category {} has {}+ orders; compared to the category as a whole",
                cat, self.min_peer_orders
            ),
            (BenchmarkBasis::PlatformPeers, _) => {
                format!("compared to {} peers across the platform", self.peer_count)
            }
            _ => "compared to platform average".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the peer benchmark for `category` without caching.
///
/// Never fails: missing categories and missing peers widen the comparison
/// pool (category peers → category pool → platform average) and the basis
/// records which step was used. A dataset without a category column is
/// benchmarked against sellers platform-wide whatever `category` says.
pub fn calculate_peer_benchmark(
    dataset: &Dataset,
    category: Option<&str>,
    config: &BenchmarkConfig,
) -> PeerBenchmark {
    if !dataset.has_categories() {
        return benchmark_pool(
            dataset.all(),
            None,
            BenchmarkBasis::PlatformPeers,
            BenchmarkBasis::PlatformAverage,
            config,
        );
    }

    let Some(category) = category else {
        debug!("no category resolved; using platform average");
        return pool_as_single_peer(dataset.all(), None, BenchmarkBasis::PlatformAverage, config);
    };

    let pool = dataset.category_records(category);
    if pool.is_empty() {
        warn!(category, "category has no records; using platform average");
        return pool_as_single_peer(dataset.all(), None, BenchmarkBasis::PlatformAverage, config);
    }

    benchmark_pool(
        pool,
        Some(category),
        BenchmarkBasis::CategoryPeers,
        BenchmarkBasis::CategoryPool,
        config,
    )
}

/// Per-metric mean across vectors, skipping vectors where the metric is
/// absent. A metric no vector has stays absent.
pub fn average_metric_vectors(vectors: &[MetricVector]) -> MetricVector {
    let mut baseline = MetricVector::empty();
    for key in MetricKey::ALL {
        let values = present_values(vectors, key);
        baseline.set(key, crate::metrics::mean(&values));
    }
    baseline
}

/// Count, mean, median, range and sample standard deviation per metric.
pub fn metric_distributions(vectors: &[MetricVector]) -> BTreeMap<MetricKey, MetricDistribution> {
    let mut out = BTreeMap::new();
    for key in MetricKey::ALL {
        let values = present_values(vectors, key);
        if let Some(dist) = distribution(values) {
            out.insert(key, dist);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn benchmark_pool(
    pool: Vec<&CanonicalRecord>,
    category: Option<&str>,
    peer_basis: BenchmarkBasis,
    fallback_basis: BenchmarkBasis,
    config: &BenchmarkConfig,
) -> PeerBenchmark {
    let groups = group_by_seller(&pool);
    let pool_sellers = groups.len();

    let qualifying: Vec<(&str, &Vec<&CanonicalRecord>)> = groups
        .iter()
        .filter(|(_, records)| records.len() >= config.min_peer_orders)
        .map(|(id, records)| (*id, records))
        .collect();

    debug!(
        category = category.unwrap_or("-"),
        pool_sellers,
        qualifying = qualifying.len(),
        min_orders = config.min_peer_orders,
        "selected peers"
    );

    if qualifying.is_empty() {
        warn!(
            category = category.unwrap_or("-"),
            min_orders = config.min_peer_orders,
            "no seller meets the order threshold; using pool as a single peer"
        );
        let mut benchmark = pool_as_single_peer(pool, category, fallback_basis, config);
        benchmark.pool_sellers = pool_sellers;
        return benchmark;
    }

    let vectors: Vec<MetricVector> = qualifying
        .iter()
        .map(|(_, records)| compute_metric_vector(records, config))
        .collect();
    let peers = qualifying
        .iter()
        .map(|(id, records)| PeerSummary {
            seller_id: id.to_string(),
            orders: records.len(),
        })
        .collect();

    PeerBenchmark {
        basis: peer_basis,
        category: category.map(str::to_string),
        peer_count: vectors.len(),
        pool_sellers,
        pool_records: pool.len(),
        min_peer_orders: config.min_peer_orders,
        peers,
        baseline: average_metric_vectors(&vectors),
        distribution: metric_distributions(&vectors),
    }
}

fn pool_as_single_peer(
    pool: Vec<&CanonicalRecord>,
    category: Option<&str>,
    basis: BenchmarkBasis,
    config: &BenchmarkConfig,
) -> PeerBenchmark {
    PeerBenchmark {
        basis,
        category: category.map(str::to_string),
        peer_count: 0,
        pool_sellers: group_by_seller(&pool).len(),
        pool_records: pool.len(),
        min_peer_orders: config.min_peer_orders,
        peers: Vec::new(),
        baseline: compute_metric_vector(&pool, config),
        distribution: BTreeMap::new(),
    }
}

/// Records grouped by seller id in id order. Records without a seller are
/// left out; they still count towards the ungrouped pool.
fn group_by_seller<'a>(records: &[&'a CanonicalRecord]) -> BTreeMap<&'a str, Vec<&'a CanonicalRecord>> {
    let mut groups: BTreeMap<&str, Vec<&CanonicalRecord>> = BTreeMap::new();
    for r in records {
        if let Some(id) = r.seller_id.as_deref() {
            groups.entry(id).or_default().push(*r);
        }
    }
    groups
}

fn present_values(vectors: &[MetricVector], key: MetricKey) -> Vec<Decimal> {
    vectors.iter().filter_map(|v| v.get(key)).collect()
}

fn distribution(mut values: Vec<Decimal>) -> Option<MetricDistribution> {
    let count = values.len();
    if count == 0 {
        return None;
    }
    values.sort();

    let sum: Decimal = values.iter().copied().sum();
    let mean = sum / Decimal::from(count as u64);
    let median = if count % 2 == 0 {
        (values[count / 2 - 1] + values[count / 2]) / dec!(2)
    } else {
        values[count / 2]
    };

    let std_dev = if count > 1 {
        let variance: Decimal = values
            .iter()
            .map(|v| {
                let diff = *v - mean;
                diff * diff
            })
            .sum::<Decimal>()
            / Decimal::from((count - 1) as u64);
        variance.sqrt().unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    Some(MetricDistribution {
        count,
        mean,
        median,
        low: values[0],
        high: values[count - 1],
        std_dev,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::CanonicalField;
    use crate::metrics::test_support::order;

    fn seller_orders(seller: &str, category: Option<&str>, n: usize, amount: Decimal) -> Vec<CanonicalRecord> {
        (0..n)
            .map(|i| {
                let mut r = order(1 + (i % 28) as u32, amount);
                r.seller_id = Some(seller.into());
                r.category_resolved = category.map(str::to_string);
                r
            })
            .collect()
    }

    fn dataset(parts: Vec<Vec<CanonicalRecord>>) -> Dataset {
        Dataset::from_records(parts.into_iter().flatten().collect())
    }

    #[test]
    fn test_category_peers_average() {
        let ds = dataset(vec![
            seller_orders("a", Some("패션"), 10, dec!(1000)),
            seller_orders("b", Some("패션"), 20, dec!(3000)),
            seller_orders("c", Some("뷰티"), 50, dec!(9999)),
        ]);
        let bench = calculate_peer_benchmark(&ds, Some("패션"), &BenchmarkConfig::default());

        assert_eq!(bench.basis, BenchmarkBasis::CategoryPeers);
        assert_eq!(bench.category.as_deref(), Some("패션"));
        assert_eq!(bench.peer_count, 2);
        assert_eq!(bench.pool_records, 30);
        // revenue: (10_000 + 60_000) / 2
        assert_eq!(bench.baseline.get(MetricKey::TotalRevenue), Some(dec!(35000)));
        // AOV from each peer's own orders: (1000 + 3000) / 2
        assert_eq!(bench.baseline.get(MetricKey::AvgOrderValue), Some(dec!(2000)));
        assert_eq!(bench.describe(), "compared to 2 peers in category 패션");
    }

    #[test]
    fn test_threshold_excludes_small_sellers() {
        let ds = dataset(vec![
            seller_orders("big", Some("패션"), 12, dec!(1000)),
            seller_orders("tiny", Some("패션"), 9, dec!(50000)),
        ]);
        let bench = calculate_peer_benchmark(&ds, Some("패션"), &BenchmarkConfig::default());
        assert_eq!(bench.peer_count, 1);
        assert_eq!(bench.pool_sellers, 2);
        assert_eq!(bench.peers[0].seller_id, "big");
        assert_eq!(bench.baseline.get(MetricKey::AvgOrderValue), Some(dec!(1000)));
    }

    #[test]
    fn test_absent_metric_does_not_dilute_mean() {
        let mut with_status = seller_orders("a", Some("패션"), 10, dec!(1000));
        for r in with_status.iter_mut().take(2) {
            r.status = Some("결제취소".into());
        }
        for r in with_status.iter_mut().skip(2) {
            r.status = Some("배송완료".into());
        }
        let without_status = seller_orders("b", Some("패션"), 10, dec!(1000));
        let ds = dataset(vec![with_status, without_status]);

        let bench = calculate_peer_benchmark(&ds, Some("패션"), &BenchmarkConfig::default());
        assert_eq!(bench.peer_count, 2);
        // only seller a knows its cancel rate
        assert_eq!(bench.baseline.get(MetricKey::CancelRate), Some(dec!(0.2)));
        assert_eq!(bench.distribution[&MetricKey::CancelRate].count, 1);
        assert_eq!(bench.distribution[&MetricKey::TotalOrders].count, 2);
    }

    #[test]
    fn test_metric_absent_for_every_peer_stays_absent() {
        let ds = dataset(vec![
            seller_orders("a", Some("패션"), 10, dec!(1000)),
            seller_orders("b", Some("패션"), 10, dec!(1000)),
        ]);
        let bench = calculate_peer_benchmark(&ds, Some("패션"), &BenchmarkConfig::default());
        assert!(bench.baseline.is_absent(MetricKey::RepeatRate));
        assert!(!bench.distribution.contains_key(&MetricKey::RepeatRate));
    }

    #[test]
    fn test_no_qualifying_peer_uses_category_pool() {
        let ds = dataset(vec![
            seller_orders("a", Some("패션"), 5, dec!(1000)),
            seller_orders("b", Some("패션"), 8, dec!(2000)),
            seller_orders("c", Some("뷰티"), 40, dec!(7000)),
        ]);
        let config = BenchmarkConfig::default();
        let bench = calculate_peer_benchmark(&ds, Some("패션"), &config);

        assert_eq!(bench.basis, BenchmarkBasis::CategoryPool);
        assert_eq!(bench.peer_count, 0);
        assert_eq!(bench.pool_sellers, 2);
        let pool = ds.category_records("패션");
        assert_eq!(bench.baseline, compute_metric_vector(&pool, &config));
        assert_eq!(bench.baseline.get(MetricKey::TotalOrders), Some(dec!(13)));
        assert!(bench.distribution.is_empty());
    }

    #[test]
    fn test_no_category_uses_platform_average() {
        let records: Vec<CanonicalRecord> = vec![
            seller_orders("a", None, 10, dec!(1000)),
            seller_orders("b", None, 10, dec!(3000)),
        ]
        .into_iter()
        .flatten()
        .collect();
        // category column present but nothing resolved
        let ds = Dataset::new(
            records,
            [CanonicalField::PaymentDate, CanonicalField::OrderAmount, CanonicalField::Category],
        );
        let config = BenchmarkConfig::default();
        let bench = calculate_peer_benchmark(&ds, None, &config);

        assert_eq!(bench.basis, BenchmarkBasis::PlatformAverage);
        assert_eq!(bench.category, None);
        assert_eq!(bench.baseline, compute_metric_vector(&ds.all(), &config));
        assert_eq!(bench.describe(), "compared to platform average");
    }

    #[test]
    fn test_dataset_without_categories_groups_platform_wide() {
        let records: Vec<CanonicalRecord> = vec![
            seller_orders("a", None, 10, dec!(1000)),
            seller_orders("b", None, 10, dec!(3000)),
        ]
        .into_iter()
        .flatten()
        .collect();
        let ds = Dataset::new(
            records,
            [CanonicalField::PaymentDate, CanonicalField::OrderAmount, CanonicalField::Seller],
        );
        let bench = calculate_peer_benchmark(&ds, None, &BenchmarkConfig::default());
        assert_eq!(bench.basis, BenchmarkBasis::PlatformPeers);
        assert_eq!(bench.peer_count, 2);
        assert_eq!(bench.category, None);
        assert_eq!(bench.describe(), "compared to 2 peers across the platform");
    }

    #[test]
    fn test_unknown_category_falls_back_to_platform() {
        let ds = dataset(vec![seller_orders("a", Some("패션"), 10, dec!(1000))]);
        let bench = calculate_peer_benchmark(&ds, Some("식품"), &BenchmarkConfig::default());
        assert_eq!(bench.basis, BenchmarkBasis::PlatformAverage);
        assert_eq!(bench.category, None);
    }

    #[test]
    fn test_records_without_seller_stay_in_pool_only() {
        let mut anonymous = seller_orders("x", Some("패션"), 3, dec!(100));
        for r in anonymous.iter_mut() {
            r.seller_id = None;
        }
        let ds = dataset(vec![anonymous, seller_orders("a", Some("패션"), 10, dec!(1000))]);
        let bench = calculate_peer_benchmark(&ds, Some("패션"), &BenchmarkConfig::default());
        assert_eq!(bench.pool_sellers, 1);
        assert_eq!(bench.pool_records, 13);
        assert_eq!(bench.baseline.get(MetricKey::TotalOrders), Some(dec!(10)));
    }

    #[test]
    fn test_distribution_statistics() {
        let vectors = vec![
            MetricVector::empty().with(MetricKey::TotalRevenue, dec!(800000)),
            MetricVector::empty().with(MetricKey::TotalRevenue, dec!(1200000)),
            MetricVector::empty().with(MetricKey::TotalRevenue, dec!(1000000)),
        ];
        let dist = &metric_distributions(&vectors)[&MetricKey::TotalRevenue];
        assert_eq!(dist.count, 3);
        assert_eq!(dist.mean, dec!(1000000));
        assert_eq!(dist.median, dec!(1000000));
        assert_eq!(dist.low, dec!(800000));
        assert_eq!(dist.high, dec!(1200000));
        assert_eq!(dist.std_dev.round_dp(4), dec!(200000));
    }
}
