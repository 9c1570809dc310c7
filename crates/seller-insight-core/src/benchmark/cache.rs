use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use super::peers::{calculate_peer_benchmark, PeerBenchmark};
use crate::config::BenchmarkConfig;
use crate::ingest::{Dataset, DatasetFingerprint};

/// Identifies one benchmark computation. Two runs over structurally
/// identical data for the same category and threshold share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub category: Option<String>,
    pub fingerprint: DatasetFingerprint,
    pub min_peer_orders: usize,
}

impl CacheKey {
    pub fn new(dataset: &Dataset, category: Option<&str>, config: &BenchmarkConfig) -> Self {
        CacheKey {
            category: category.map(str::to_string),
            fingerprint: dataset.fingerprint(),
            min_peer_orders: config.min_peer_orders,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
}

/// Benchmark memo scoped to a single run. A cache must only be used with one
/// `BenchmarkConfig`; the key does not cover status labels or thresholds
/// other than `min_peer_orders`.
#[derive(Debug, Default)]
pub struct BenchmarkCache {
    entries: HashMap<CacheKey, PeerBenchmark>,
    hits: usize,
    misses: usize,
}

impl BenchmarkCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached benchmark for `category`, computing it on a miss.
    pub fn get_or_compute(
        &mut self,
        dataset: &Dataset,
        category: Option<&str>,
        config: &BenchmarkConfig,
    ) -> PeerBenchmark {
        let key = CacheKey::new(dataset, category, config);
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            debug!(category = category.unwrap_or("-"), "benchmark cache hit");
            return hit.clone();
        }

        self.misses += 1;
        debug!(category = category.unwrap_or("-"), "benchmark cache miss");
        let benchmark = calculate_peer_benchmark(dataset, category, config);
        self.entries.insert(key, benchmark.clone());
        benchmark
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}
