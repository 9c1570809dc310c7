use chrono::{Datelike, Timelike, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::BenchmarkConfig;
use crate::ingest::CanonicalRecord;
use crate::metrics::{mean, safe_ratio, Polarity};
use crate::relative::{classify_tier, PerformanceTier};
use crate::types::{Money, Ratio};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    /// `"14"` for hours, `"Mon"` for weekdays, `"2025-08-01"` for days
    pub bucket: String,
    pub orders: usize,
    pub revenue: Money,
    pub ratio: Option<Ratio>,
    pub tier: Option<PerformanceTier>,
}

/// One bucket kind (hourly, weekday or daily) for the seller. `ratio` on each
/// bucket is its revenue over `pool_mean_revenue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Mean revenue of the pool's buckets of this kind
    pub pool_mean_revenue: Option<Money>,
    pub buckets: Vec<TimeBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBreakdown {
    pub hourly: TimeSeries,
    pub weekday: TimeSeries,
    pub daily: TimeSeries,
}

/// Seller revenue per hour of day, weekday and calendar day. Each bucket is
/// divided by the mean revenue over all pool buckets of the same kind.
/// Buckets without seller orders are left out.
pub fn time_breakdown(
    seller: &[&CanonicalRecord],
    pool: &[&CanonicalRecord],
    config: &BenchmarkConfig,
) -> TimeBreakdown {
    let compare = |key: fn(&CanonicalRecord) -> (u32, String)| {
        let theirs = bucket_totals(pool, key);
        let pool_revenues: Vec<Money> = theirs.values().map(|(_, revenue)| *revenue).collect();
        let pool_mean_revenue = mean(&pool_revenues);
        let buckets = bucket_totals(seller, key)
            .into_iter()
            .map(|(bucket, (orders, revenue))| {
                let ratio = pool_mean_revenue.and_then(|m| safe_ratio(revenue, m));
                TimeBucket {
                    bucket: bucket.1,
                    orders,
                    revenue,
                    ratio,
                    tier: ratio.map(|r| classify_tier(r, Polarity::Direct, &config.tiers)),
                }
            })
            .collect();
        TimeSeries {
            pool_mean_revenue,
            buckets,
        }
    };

    TimeBreakdown {
        hourly: compare(hour_key),
        weekday: compare(weekday_key),
        daily: compare(day_key),
    }
}

/// The seller's best hour by revenue; earliest hour wins ties.
pub fn peak_hour(breakdown: &TimeBreakdown) -> Option<&TimeBucket> {
    breakdown
        .hourly
        .buckets
        .iter()
        .fold(None, |best: Option<&TimeBucket>, b| match best {
            Some(cur) if cur.revenue >= b.revenue => Some(cur),
            _ => Some(b),
        })
}

fn bucket_totals(
    records: &[&CanonicalRecord],
    key: fn(&CanonicalRecord) -> (u32, String),
) -> BTreeMap<(u32, String), (usize, Money)> {
    let mut totals: BTreeMap<(u32, String), (usize, Money)> = BTreeMap::new();
    for r in records {
        let entry = totals.entry(key(r)).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += r.amount;
    }
    totals
}

fn hour_key(r: &CanonicalRecord) -> (u32, String) {
    let hour = r.timestamp.hour();
    (hour, format!("{hour:02}"))
}

fn weekday_key(r: &CanonicalRecord) -> (u32, String) {
    let day: Weekday = r.timestamp.weekday();
    (day.num_days_from_monday(), day.to_string())
}

fn day_key(r: &CanonicalRecord) -> (u32, String) {
    let date = r.timestamp.date();
    (date.num_days_from_ce() as u32, date.format("%Y-%m-%d").to_string())
}
