//! Peer benchmarking: pick the comparison pool for a category and average
//! the per-seller metric vectors into a baseline.

pub mod cache;
pub mod peers;

pub use cache::{BenchmarkCache, CacheKey, CacheStats};
pub use peers::{
    average_metric_vectors, calculate_peer_benchmark, metric_distributions, BenchmarkBasis,
    MetricDistribution, PeerBenchmark, PeerSummary,
};
