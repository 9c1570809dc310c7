use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ingest::CanonicalRecord;
use crate::types::{Money, Rate};

/// Revenue a seller books in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub orders: usize,
    pub revenue: Money,
    pub revenue_share: Rate,
}

/// Per-category revenue, largest first. Records without a resolved category
/// are ignored; ties are ordered by label.
pub fn category_mix(records: &[&CanonicalRecord]) -> Vec<CategoryShare> {
    let mut totals: BTreeMap<&str, (usize, Money)> = BTreeMap::new();
    for r in records {
        if let Some(cat) = r.category_resolved.as_deref() {
            let entry = totals.entry(cat).or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += r.amount;
        }
    }

    let total: Money = totals.values().map(|(_, rev)| *rev).sum();
    let mut mix: Vec<CategoryShare> = totals
        .into_iter()
        .map(|(category, (orders, revenue))| CategoryShare {
            category: category.to_string(),
            orders,
            revenue,
            revenue_share: if total.is_zero() {
                Decimal::ZERO
            } else {
                revenue / total
            },
        })
        .collect();
    // stable sort keeps label order among equal revenues
    mix.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    mix
}

/// The category carrying the largest summed amount for this seller.
///
/// `None` when no record has a resolved category; callers then benchmark
/// against the platform average.
pub fn main_category(records: &[&CanonicalRecord]) -> Option<String> {
    category_mix(records).into_iter().next().map(|s| s.category)
}
