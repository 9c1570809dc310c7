use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashMap};
use std::hash::{Hash, Hasher};

use super::columns::CanonicalField;
use crate::types::{Money, Period};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One normalized order line. `timestamp` and `amount` are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub timestamp: NaiveDateTime,
    pub amount: Money,
    pub quantity: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_resolved: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_date: Option<NaiveDateTime>,
}

impl CanonicalRecord {
    /// Bare order line, mostly useful for building fixtures.
    pub fn new(timestamp: NaiveDateTime, amount: Money) -> Self {
        CanonicalRecord {
            timestamp,
            amount,
            quantity: Decimal::ONE,
            seller_id: None,
            channel: None,
            status: None,
            item_name: None,
            category_raw: None,
            category_resolved: None,
            customer_key: None,
            region: None,
            ship_date: None,
            delivered_date: None,
        }
    }
}

/// Structural identity of a dataset, used as part of benchmark cache keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetFingerprint {
    pub row_count: usize,
    pub column_hash: u64,
    pub first_timestamp: Option<NaiveDateTime>,
    pub last_timestamp: Option<NaiveDateTime>,
}

/// Immutable set of canonical records for one report run.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<CanonicalRecord>,
    fields: BTreeSet<CanonicalField>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl Dataset {
    /// `fields` lists the canonical fields the source actually carried.
    pub fn new(records: Vec<CanonicalRecord>, fields: impl IntoIterator<Item = CanonicalField>) -> Self {
        Dataset {
            records,
            fields: fields.into_iter().collect(),
        }
    }

    /// Dataset whose field set is inferred from the populated record fields.
    pub fn from_records(records: Vec<CanonicalRecord>) -> Self {
        let mut fields: BTreeSet<CanonicalField> =
            [CanonicalField::PaymentDate, CanonicalField::OrderAmount]
                .into_iter()
                .collect();
        for r in &records {
            let populated = [
                (CanonicalField::Seller, r.seller_id.is_some()),
                (CanonicalField::Channel, r.channel.is_some()),
                (CanonicalField::Status, r.status.is_some()),
                (CanonicalField::ItemName, r.item_name.is_some()),
                (CanonicalField::Category, r.category_raw.is_some() || r.category_resolved.is_some()),
                (CanonicalField::BuyerId, r.customer_key.is_some()),
                (CanonicalField::Address, r.region.is_some()),
                (CanonicalField::ShipDate, r.ship_date.is_some()),
                (CanonicalField::DeliveredDate, r.delivered_date.is_some()),
            ];
            for (field, present) in populated {
                if present {
                    fields.insert(field);
                }
            }
        }
        Dataset { records, fields }
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_field(&self, field: CanonicalField) -> bool {
        self.fields.contains(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        self.fields.iter().copied()
    }

    /// Whether category resolution is available for this dataset at all.
    pub fn has_categories(&self) -> bool {
        self.has_field(CanonicalField::Category)
    }

    /// Every record, borrowed.
    pub fn all(&self) -> Vec<&CanonicalRecord> {
        self.records.iter().collect()
    }

    /// Distinct seller ids, sorted.
    pub fn sellers(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .records
            .iter()
            .filter_map(|r| r.seller_id.as_deref())
            .collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Records belonging to one seller.
    pub fn seller_records(&self, seller_id: &str) -> Vec<&CanonicalRecord> {
        self.records
            .iter()
            .filter(|r| r.seller_id.as_deref() == Some(seller_id))
            .collect()
    }

    /// Records whose resolved category equals `category`.
    pub fn category_records(&self, category: &str) -> Vec<&CanonicalRecord> {
        self.records
            .iter()
            .filter(|r| r.category_resolved.as_deref() == Some(category))
            .collect()
    }

    /// Orders per seller, sorted by seller id.
    pub fn order_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for r in &self.records {
            if let Some(id) = r.seller_id.as_deref() {
                *counts.entry(id).or_default() += 1;
            }
        }
        let mut out: Vec<(String, usize)> =
            counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    pub fn period(&self) -> Option<Period> {
        Period::spanning(self.records.iter().map(|r| r.timestamp))
    }

    /// Records paid on or after `start` and on or before `end` (whole days).
    pub fn within(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Dataset {
        let records = self
            .records
            .iter()
            .filter(|r| {
                let day = r.timestamp.date();
                start.map_or(true, |s| day >= s) && end.map_or(true, |e| day <= e)
            })
            .cloned()
            .collect();
        Dataset {
            records,
            fields: self.fields.clone(),
        }
    }

    pub fn fingerprint(&self) -> DatasetFingerprint {
        let mut hasher = DefaultHasher::new();
        for field in &self.fields {
            field.hash(&mut hasher);
        }
        let period = self.period();
        DatasetFingerprint {
            row_count: self.records.len(),
            column_hash: hasher.finish(),
            first_timestamp: period.as_ref().map(|p| p.start),
            last_timestamp: period.as_ref().map(|p| p.end),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
