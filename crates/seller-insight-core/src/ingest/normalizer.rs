use rust_decimal::Decimal;
use std::collections::HashMap;

use super::columns::{CanonicalField, ColumnMapping};
use super::customer::{customer_key, BuyerIdentity};
use super::parse::{non_empty, parse_number, parse_timestamp};
use super::record::CanonicalRecord;
use super::region::extract_region;
use crate::category::CategoryMapping;

/// One raw spreadsheet row: source header → cell text.
pub type RawRow = HashMap<String, String>;

/// Normalize one raw row. Rows without a usable payment date or amount
/// return `None`.
pub fn normalize_row(
    row: &RawRow,
    columns: &ColumnMapping,
    categories: &CategoryMapping,
) -> Option<CanonicalRecord> {
    let cell = |field: CanonicalField| row.get(columns.source(field)).and_then(|v| non_empty(v));

    let timestamp = cell(CanonicalField::PaymentDate).and_then(parse_timestamp)?;
    let amount = cell(CanonicalField::OrderAmount).and_then(parse_number)?;

    let quantity = cell(CanonicalField::Quantity)
        .and_then(parse_number)
        .unwrap_or(Decimal::ONE);

    let identity = BuyerIdentity {
        name: cell(CanonicalField::BuyerName),
        phone: cell(CanonicalField::BuyerPhone),
        buyer_id: cell(CanonicalField::BuyerId),
    };

    let category_raw = cell(CanonicalField::Category).map(str::to_string);
    let category_resolved = category_raw
        .as_deref()
        .and_then(|code| categories.resolve(code));

    Some(CanonicalRecord {
        timestamp,
        amount,
        quantity,
        seller_id: cell(CanonicalField::Seller).map(str::to_string),
        channel: cell(CanonicalField::Channel).map(str::to_string),
        status: cell(CanonicalField::Status).map(str::to_string),
        item_name: cell(CanonicalField::ItemName).map(str::to_string),
        category_raw,
        category_resolved,
        customer_key: customer_key(&identity),
        region: cell(CanonicalField::Address).and_then(extract_region),
        ship_date: cell(CanonicalField::ShipDate).and_then(parse_timestamp),
        delivered_date: cell(CanonicalField::DeliveredDate).and_then(parse_timestamp),
    })
}
