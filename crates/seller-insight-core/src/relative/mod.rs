//! Seller vs peer comparison: ratios, tiers, grades and the overall score.

pub mod performance;
pub mod scorecard;
pub mod tiers;

pub use performance::{compute_relative, RelativeMetric, RelativeMetricVector};
pub use scorecard::{compute_scorecard, overall_grade, ScoreComponent, Scorecard, SCORECARD_METRICS};
pub use tiers::{classify_tier, letter_grade, Grade, PerformanceTier};
