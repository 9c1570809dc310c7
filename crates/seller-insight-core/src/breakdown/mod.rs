//! Channel, region, product and time-of-day breakdowns against the
//! benchmark pool.

pub mod dimension;
pub mod time;

pub use dimension::{dimension_breakdown, Dimension, DimensionBreakdown, SegmentComparison, SegmentStats};
pub use time::{peak_hour, time_breakdown, TimeBreakdown, TimeBucket, TimeSeries};

use serde::{Deserialize, Serialize};

use crate::config::BenchmarkConfig;
use crate::ingest::CanonicalRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdowns {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<DimensionBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<DimensionBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<DimensionBreakdown>,
    pub time: TimeBreakdown,
    /// Hour of day with the most seller revenue, `"14"` style
    pub peak_hour: Option<String>,
}

pub fn compute_breakdowns(
    seller: &[&CanonicalRecord],
    pool: &[&CanonicalRecord],
    config: &BenchmarkConfig,
) -> Breakdowns {
    let time = time_breakdown(seller, pool, config);
    let peak_hour = peak_hour(&time).map(|b| b.bucket.clone());
    Breakdowns {
        channel: dimension_breakdown(Dimension::Channel, seller, pool, config),
        region: dimension_breakdown(Dimension::Region, seller, pool, config),
        product: dimension_breakdown(Dimension::Product, seller, pool, config),
        time,
        peak_hour,
    }
}
