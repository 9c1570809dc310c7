use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use seller_insight_core::benchmark::{calculate_peer_benchmark, BenchmarkBasis, BenchmarkCache};
use seller_insight_core::config::BenchmarkConfig;
use seller_insight_core::ingest::{CanonicalField, CanonicalRecord, Dataset};
use seller_insight_core::metrics::{compute_metric_vector, MetricKey, MetricVector};
use seller_insight_core::relative::{compute_relative, PerformanceTier};
use seller_insight_core::report::{analyze_seller, AnalysisContext};

// ===========================================================================
// Fixtures
// ===========================================================================

fn paid_at(n: usize) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 7, 1 + (n % 30) as u32)
        .unwrap()
        .and_hms_opt(9 + (n % 12) as u32, 0, 0)
        .unwrap()
}

/// `orders` equal-sized orders adding up to `revenue`.
fn seller(id: &str, category: Option<&str>, orders: usize, revenue: Decimal) -> Vec<CanonicalRecord> {
    let amount = revenue / Decimal::from(orders as u64);
    (0..orders)
        .map(|n| {
            let mut r = CanonicalRecord::new(paid_at(n), amount);
            r.seller_id = Some(id.to_string());
            r.category_resolved = category.map(str::to_string);
            r
        })
        .collect()
}

fn with_cancellations(mut records: Vec<CanonicalRecord>, cancelled: usize) -> Vec<CanonicalRecord> {
    for (i, r) in records.iter_mut().enumerate() {
        r.status = Some(if i < cancelled { "결제취소" } else { "배송완료" }.to_string());
    }
    records
}

fn dataset(parts: Vec<Vec<CanonicalRecord>>) -> Dataset {
    Dataset::from_records(parts.into_iter().flatten().collect())
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[test]
fn test_scenario_revenue_on_par_with_category_peers() {
    let ds = dataset(vec![
        seller("me", Some("fashion"), 100, dec!(1_000_000)),
        seller("p1", Some("fashion"), 40, dec!(800_000)),
        seller("p2", Some("fashion"), 60, dec!(1_200_000)),
        seller("p3", Some("fashion"), 50, dec!(1_000_000)),
    ]);
    let mut ctx = AnalysisContext::default();
    let report = analyze_seller(&mut ctx, &ds, "me").unwrap().result;

    assert_eq!(report.category.as_deref(), Some("fashion"));
    let bench = report.benchmark.as_ref().unwrap();
    assert_eq!(bench.basis, BenchmarkBasis::CategoryPeers);
    assert_eq!(bench.baseline.get(MetricKey::TotalRevenue), Some(dec!(1_000_000)));

    let revenue = report.relative.get(MetricKey::TotalRevenue).unwrap();
    assert_eq!(revenue.ratio, dec!(1));
    assert_eq!(revenue.tier, PerformanceTier::Average);
}

#[test]
fn test_scenario_no_categories_uses_platform_average() {
    // the category column exists but no code resolved
    let records = vec![
        seller("me", None, 20, dec!(200_000)),
        seller("p1", None, 30, dec!(600_000)),
    ]
    .into_iter()
    .flatten()
    .collect();
    let ds = Dataset::new(
        records,
        [CanonicalField::PaymentDate, CanonicalField::OrderAmount, CanonicalField::Seller, CanonicalField::Category],
    );
    let mut ctx = AnalysisContext::default();
    let report = analyze_seller(&mut ctx, &ds, "me").unwrap().result;

    assert_eq!(report.category, None);
    let bench = report.benchmark.as_ref().unwrap();
    assert_eq!(bench.basis, BenchmarkBasis::PlatformAverage);
    assert_eq!(bench.baseline, compute_metric_vector(&ds.all(), ctx.config()));
    assert_eq!(report.comparison, "compared to platform average");
}

#[test]
fn test_dataset_without_category_column_uses_platform_peers() {
    let ds = dataset(vec![
        seller("me", None, 20, dec!(200_000)),
        seller("p1", None, 30, dec!(600_000)),
        seller("tiny", None, 3, dec!(9_000)),
    ]);
    let mut ctx = AnalysisContext::default();
    let report = analyze_seller(&mut ctx, &ds, "me").unwrap().result;

    let bench = report.benchmark.as_ref().unwrap();
    assert_eq!(bench.basis, BenchmarkBasis::PlatformPeers);
    assert_eq!(bench.peer_count, 2);
    assert_eq!(bench.baseline.get(MetricKey::TotalRevenue), Some(dec!(400_000)));
}

#[test]
fn test_scenario_small_peers_fall_back_to_category_pool() {
    let ds = dataset(vec![
        seller("p1", Some("fashion"), 5, dec!(50_000)),
        seller("p2", Some("fashion"), 8, dec!(160_000)),
    ]);
    let config = BenchmarkConfig::default();
    let bench = calculate_peer_benchmark(&ds, Some("fashion"), &config);

    assert_eq!(bench.basis, BenchmarkBasis::CategoryPool);
    assert_eq!(bench.peer_count, 0);
    assert_eq!(bench.baseline.get(MetricKey::TotalOrders), Some(dec!(13)));
    assert_eq!(bench.baseline.get(MetricKey::TotalRevenue), Some(dec!(210_000)));
}

#[test]
fn test_scenario_lower_cancel_rate_is_excellent() {
    let seller_vec = MetricVector::empty().with(MetricKey::CancelRate, dec!(0.05));
    let peer_vec = MetricVector::empty().with(MetricKey::CancelRate, dec!(0.10));
    let rel = compute_relative(&seller_vec, &peer_vec, &BenchmarkConfig::default());

    let cancel = rel.get(MetricKey::CancelRate).unwrap();
    assert_eq!(cancel.ratio, dec!(0.5));
    assert_eq!(cancel.tier, PerformanceTier::Excellent);
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_empty_peer_set_equals_pool_vector() {
    let ds = dataset(vec![
        with_cancellations(seller("p1", Some("beauty"), 6, dec!(60_000)), 1),
        seller("p2", Some("beauty"), 9, dec!(45_000)),
        seller("other", Some("food"), 30, dec!(90_000)),
    ]);
    let config = BenchmarkConfig::default();
    let bench = calculate_peer_benchmark(&ds, Some("beauty"), &config);

    let pool = ds.category_records("beauty");
    assert_eq!(bench.baseline, compute_metric_vector(&pool, &config));
}

#[test]
fn test_benchmark_is_idempotent_through_cache() {
    let ds = dataset(vec![
        seller("a", Some("fashion"), 12, dec!(120_000)),
        seller("b", Some("fashion"), 15, dec!(300_000)),
    ]);
    let config = BenchmarkConfig::default();
    let mut cache = BenchmarkCache::new();

    let first = cache.get_or_compute(&ds, Some("fashion"), &config);
    let second = cache.get_or_compute(&ds, Some("fashion"), &config);
    assert_eq!(first, second);
    assert_eq!(first, calculate_peer_benchmark(&ds, Some("fashion"), &config));
    assert_eq!(cache.stats().hits, 1);
}

#[test]
fn test_inverse_metric_below_peer_never_below_average() {
    let ds = dataset(vec![
        with_cancellations(seller("me", Some("fashion"), 20, dec!(200_000)), 1),
        with_cancellations(seller("p1", Some("fashion"), 20, dec!(200_000)), 2),
        with_cancellations(seller("p2", Some("fashion"), 20, dec!(200_000)), 2),
    ]);
    let mut ctx = AnalysisContext::default();
    let report = analyze_seller(&mut ctx, &ds, "me").unwrap().result;

    let cancel = report.relative.get(MetricKey::CancelRate).unwrap();
    assert!(cancel.seller_value < cancel.peer_value);
    assert!(matches!(cancel.tier, PerformanceTier::Excellent | PerformanceTier::Good));
}

#[test]
fn test_ratio_absent_when_peer_value_zero() {
    let ds = dataset(vec![
        with_cancellations(seller("me", Some("fashion"), 20, dec!(200_000)), 0),
        with_cancellations(seller("p1", Some("fashion"), 20, dec!(200_000)), 0),
    ]);
    let mut ctx = AnalysisContext::default();
    let report = analyze_seller(&mut ctx, &ds, "me").unwrap().result;

    assert_eq!(report.metrics.get(MetricKey::CancelRate), Some(Decimal::ZERO));
    assert!(report.relative.get(MetricKey::CancelRate).is_none());
}

#[test]
fn test_customer_metrics_absent_without_identification() {
    let ds = dataset(vec![seller("me", Some("fashion"), 10, dec!(100_000))]);
    let mut ctx = AnalysisContext::default();
    let out = analyze_seller(&mut ctx, &ds, "me").unwrap();

    assert!(out.result.metrics.is_absent(MetricKey::RepeatRate));
    assert!(out.result.metrics.is_absent(MetricKey::UniqueCustomers));
    assert!(out.warnings.iter().any(|w| w.contains("customer metrics omitted")));
}
