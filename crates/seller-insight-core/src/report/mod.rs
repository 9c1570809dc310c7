//! Per-seller report assembly and the batch driver.

pub mod batch;

pub use batch::{run_batch, BatchFailure, BatchOutcome};

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tracing::debug;

use crate::benchmark::{BenchmarkBasis, BenchmarkCache, CacheStats, PeerBenchmark};
use crate::category::{category_mix, main_category, CategoryMapping, CategoryShare};
use crate::config::BenchmarkConfig;
use crate::error::SellerInsightError;
use crate::ingest::Dataset;
use crate::metrics::{compute_metric_vector, MetricGroup, MetricKey, MetricVector};
use crate::relative::{compute_relative, compute_scorecard, RelativeMetricVector, Scorecard};
use crate::types::{with_metadata, ComputationOutput, Period};
use crate::SellerInsightResult;

#[cfg(feature = "breakdowns")]
use crate::breakdown::{compute_breakdowns, Breakdowns};
#[cfg(feature = "breakdowns")]
use crate::ingest::CanonicalRecord;

/// Pseudo-seller id used for the whole-dataset report.
pub const OVERALL_REPORT_ID: &str = "overall";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// State shared by every report in one run: configuration, the category
/// mapping table and the benchmark cache.
#[derive(Debug)]
pub struct AnalysisContext {
    config: BenchmarkConfig,
    categories: CategoryMapping,
    cache: BenchmarkCache,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerReport {
    pub seller_id: String,
    pub period: Option<Period>,
    pub order_count: usize,
    /// Category used for benchmarking, `None` = platform average
    pub category: Option<String>,
    pub category_mix: Vec<CategoryShare>,
    pub metrics: MetricVector,
    pub benchmark: Option<PeerBenchmark>,
    pub comparison: String,
    pub relative: RelativeMetricVector,
    /// Metrics tiered excellent against the peers
    pub strengths: Vec<MetricKey>,
    /// Metrics tiered below average against the peers
    pub weaknesses: Vec<MetricKey>,
    pub scorecard: Option<Scorecard>,
    #[cfg(feature = "breakdowns")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdowns: Option<Breakdowns>,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl AnalysisContext {
    pub fn new(config: BenchmarkConfig, categories: CategoryMapping) -> SellerInsightResult<Self> {
        config.validate()?;
        Ok(AnalysisContext {
            config,
            categories,
            cache: BenchmarkCache::new(),
        })
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    pub fn categories(&self) -> &CategoryMapping {
        &self.categories
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Cached peer benchmark for `category` over `dataset`.
    pub fn benchmark(&mut self, dataset: &Dataset, category: Option<&str>) -> PeerBenchmark {
        self.cache.get_or_compute(dataset, category, &self.config)
    }
}

impl Default for AnalysisContext {
    fn default() -> Self {
        AnalysisContext {
            config: BenchmarkConfig::default(),
            categories: CategoryMapping::default(),
            cache: BenchmarkCache::new(),
        }
    }
}

/// Benchmark one seller against the peers of its main category.
///
/// Fails only when the seller has no records. Missing categories, thin peer
/// sets and absent metrics degrade the report and are listed in `warnings`.
pub fn analyze_seller(
    ctx: &mut AnalysisContext,
    dataset: &Dataset,
    seller_id: &str,
) -> SellerInsightResult<ComputationOutput<SellerReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let records = dataset.seller_records(seller_id);
    if records.is_empty() {
        return Err(SellerInsightError::SellerNotFound(seller_id.to_string()));
    }

    let metrics = compute_metric_vector(&records, &ctx.config);
    let category = main_category(&records);
    let benchmark = ctx.benchmark(dataset, category.as_deref());
    debug!(
        seller_id,
        category = category.as_deref().unwrap_or("-"),
        basis = %benchmark.basis,
        "benchmark selected"
    );

    if category.is_none() {
        warnings.push("Seller has no resolved category".into());
    }
    if benchmark.basis != BenchmarkBasis::CategoryPeers {
        warnings.push(capitalize(&benchmark.describe()));
    }
    degradation_warnings(&metrics, &mut warnings);

    let relative = compute_relative(&metrics, &benchmark.baseline, &ctx.config);
    let scorecard = compute_scorecard(&relative, &ctx.config.scorecard);
    if !scorecard.comparable {
        warnings.push("No scorecard metric could be compared; overall score is neutral".into());
    }

    #[cfg(feature = "breakdowns")]
    let breakdowns = {
        let pool: Vec<&CanonicalRecord> = match benchmark.category.as_deref() {
            Some(cat) => dataset.category_records(cat),
            None => dataset.all(),
        };
        Some(compute_breakdowns(&records, &pool, &ctx.config))
    };

    let report = SellerReport {
        seller_id: seller_id.to_string(),
        period: Period::spanning(records.iter().map(|r| r.timestamp)),
        order_count: records.len(),
        category: benchmark.category.clone(),
        category_mix: category_mix(&records),
        metrics,
        comparison: benchmark.describe(),
        strengths: relative.strengths(),
        weaknesses: relative.weaknesses(),
        relative,
        scorecard: Some(scorecard),
        #[cfg(feature = "breakdowns")]
        breakdowns,
        warnings: warnings.clone(),
        benchmark: Some(benchmark),
    };

    let assumptions = json!({
        "min_peer_orders": ctx.config.min_peer_orders,
        "category_mapping_entries": ctx.categories.len(),
        "peer_average": "per-metric mean over qualifying sellers, absent values skipped",
    });
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Category Peer Benchmark",
        &assumptions,
        warnings,
        elapsed,
        report,
    ))
}

/// Metrics for the whole dataset as one pseudo-seller. There is nothing to
/// compare it against, so no benchmark, relative metrics or scorecard.
pub fn analyze_overall(
    ctx: &AnalysisContext,
    dataset: &Dataset,
) -> SellerInsightResult<ComputationOutput<SellerReport>> {
    let start = Instant::now();
    if dataset.is_empty() {
        return Err(SellerInsightError::EmptyDataset("No orders to summarize".into()));
    }

    let records = dataset.all();
    let metrics = compute_metric_vector(&records, &ctx.config);
    let mut warnings = vec!["Overall report has no peer benchmark".to_string()];
    degradation_warnings(&metrics, &mut warnings);

    let report = SellerReport {
        seller_id: OVERALL_REPORT_ID.to_string(),
        period: dataset.period(),
        order_count: records.len(),
        category: None,
        category_mix: category_mix(&records),
        metrics,
        benchmark: None,
        comparison: "whole dataset".to_string(),
        relative: RelativeMetricVector::default(),
        strengths: Vec::new(),
        weaknesses: Vec::new(),
        scorecard: None,
        #[cfg(feature = "breakdowns")]
        breakdowns: None,
        warnings: warnings.clone(),
    };

    let assumptions = json!({ "sellers": dataset.sellers().len() });
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Whole-Dataset Summary",
        &assumptions,
        warnings,
        elapsed,
        report,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn degradation_warnings(metrics: &MetricVector, warnings: &mut Vec<String>) {
    let customer_missing = MetricKey::ALL
        .iter()
        .filter(|k| k.group() == MetricGroup::Customer)
        .all(|k| metrics.is_absent(*k));
    if customer_missing {
        warnings.push("No customer identification; customer metrics omitted".into());
    }
    if metrics.is_absent(MetricKey::CancelRate) {
        warnings.push("No order status column; status rates omitted".into());
    }
    if metrics.is_absent(MetricKey::AvgShipLeadtime) {
        warnings.push("No ship dates; lead-time metrics omitted".into());
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::order;
    use rust_decimal_macros::dec;

    fn dataset() -> Dataset {
        let mut records = Vec::new();
        for (seller, n, amount) in [("a", 12, dec!(1000)), ("b", 10, dec!(2000)), ("c", 3, dec!(500))] {
            for i in 0..n {
                let mut r = order(1 + i, amount);
                r.seller_id = Some(seller.into());
                r.category_resolved = Some("패션".into());
                r.customer_key = Some(format!("{seller}-{}", i % 4));
                records.push(r);
            }
        }
        Dataset::from_records(records)
    }

    #[test]
    fn test_analyze_seller_report() {
        let ds = dataset();
        let mut ctx = AnalysisContext::default();
        let out = analyze_seller(&mut ctx, &ds, "c").unwrap();
        let report = &out.result;

        assert_eq!(report.seller_id, "c");
        assert_eq!(report.category.as_deref(), Some("패션"));
        assert_eq!(report.order_count, 3);
        let bench = report.benchmark.as_ref().unwrap();
        assert_eq!(bench.basis, BenchmarkBasis::CategoryPeers);
        assert_eq!(bench.peer_count, 2);
        // AOV: 500 vs (1000 + 2000) / 2
        assert_eq!(
            report.relative.ratio(MetricKey::AvgOrderValue),
            Some(dec!(500) / dec!(1500))
        );
        assert!(report.scorecard.as_ref().unwrap().comparable);
        assert!(out
            .warnings
            .iter()
            .any(|w| w.contains("status rates omitted")));
    }

    #[test]
    fn test_unknown_seller_is_error() {
        let ds = dataset();
        let mut ctx = AnalysisContext::default();
        let err = analyze_seller(&mut ctx, &ds, "zzz").unwrap_err();
        assert!(matches!(err, SellerInsightError::SellerNotFound(id) if id == "zzz"));
    }

    #[test]
    fn test_same_category_sellers_share_benchmark() {
        let ds = dataset();
        let mut ctx = AnalysisContext::default();
        let a = analyze_seller(&mut ctx, &ds, "a").unwrap();
        let b = analyze_seller(&mut ctx, &ds, "b").unwrap();
        assert_eq!(a.result.benchmark, b.result.benchmark);
        assert_eq!(ctx.cache_stats().hits, 1);
        assert_eq!(ctx.cache_stats().misses, 1);
    }

    #[test]
    fn test_overall_report_has_no_benchmark() {
        let ds = dataset();
        let ctx = AnalysisContext::default();
        let out = analyze_overall(&ctx, &ds).unwrap();
        assert_eq!(out.result.seller_id, OVERALL_REPORT_ID);
        assert!(out.result.benchmark.is_none());
        assert!(out.result.scorecard.is_none());
        assert_eq!(out.result.metrics.get(MetricKey::TotalOrders), Some(dec!(25)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = BenchmarkConfig {
            min_peer_orders: 0,
            ..BenchmarkConfig::default()
        };
        assert!(AnalysisContext::new(config, CategoryMapping::default()).is_err());
    }
}
