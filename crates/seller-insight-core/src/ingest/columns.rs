use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::SellerInsightError;
use crate::SellerInsightResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Canonical fields a source order list can provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    PaymentDate,
    OrderAmount,
    Seller,
    Channel,
    Status,
    ItemName,
    Quantity,
    ShipDate,
    DeliveredDate,
    BuyerName,
    BuyerPhone,
    BuyerId,
    Address,
    PostalCode,
    Category,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 15] = [
        CanonicalField::PaymentDate,
        CanonicalField::OrderAmount,
        CanonicalField::Seller,
        CanonicalField::Channel,
        CanonicalField::Status,
        CanonicalField::ItemName,
        CanonicalField::Quantity,
        CanonicalField::ShipDate,
        CanonicalField::DeliveredDate,
        CanonicalField::BuyerName,
        CanonicalField::BuyerPhone,
        CanonicalField::BuyerId,
        CanonicalField::Address,
        CanonicalField::PostalCode,
        CanonicalField::Category,
    ];

    /// Fields without which the order list cannot be ingested.
    pub const REQUIRED: [CanonicalField; 2] =
        [CanonicalField::PaymentDate, CanonicalField::OrderAmount];

    /// Header used by the marketplace order-list export.
    pub fn default_column(&self) -> &'static str {
        match self {
            CanonicalField::PaymentDate => "결제일",
            CanonicalField::OrderAmount => "상품별 총 주문금액",
            CanonicalField::Seller => "입점사명",
            CanonicalField::Channel => "판매채널",
            CanonicalField::Status => "주문상태",
            CanonicalField::ItemName => "상품명",
            CanonicalField::Quantity => "수량",
            CanonicalField::ShipDate => "발송처리일",
            CanonicalField::DeliveredDate => "배송완료일",
            CanonicalField::BuyerName => "구매자명",
            CanonicalField::BuyerPhone => "구매자연락처",
            CanonicalField::BuyerId => "구매자아이디",
            CanonicalField::Address => "배송지주소",
            CanonicalField::PostalCode => "배송지우편번호",
            CanonicalField::Category => "상품 카테고리",
        }
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CanonicalField::PaymentDate => "payment_date",
            CanonicalField::OrderAmount => "order_amount",
            CanonicalField::Seller => "seller",
            CanonicalField::Channel => "channel",
            CanonicalField::Status => "status",
            CanonicalField::ItemName => "item_name",
            CanonicalField::Quantity => "quantity",
            CanonicalField::ShipDate => "ship_date",
            CanonicalField::DeliveredDate => "delivered_date",
            CanonicalField::BuyerName => "buyer_name",
            CanonicalField::BuyerPhone => "buyer_phone",
            CanonicalField::BuyerId => "buyer_id",
            CanonicalField::Address => "address",
            CanonicalField::PostalCode => "postal_code",
            CanonicalField::Category => "category",
        };
        write!(f, "{name}")
    }
}

/// Canonical field → source column header.
///
/// Deserializes from a partial map; fields left out keep their default
/// header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<CanonicalField, String>", into = "BTreeMap<CanonicalField, String>")]
pub struct ColumnMapping {
    columns: BTreeMap<CanonicalField, String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        let columns = CanonicalField::ALL
            .iter()
            .map(|f| (*f, f.default_column().to_string()))
            .collect();
        ColumnMapping { columns }
    }
}

impl From<BTreeMap<CanonicalField, String>> for ColumnMapping {
    fn from(overrides: BTreeMap<CanonicalField, String>) -> Self {
        let mut mapping = ColumnMapping::default();
        for (field, column) in overrides {
            mapping.set(field, column);
        }
        mapping
    }
}

impl From<ColumnMapping> for BTreeMap<CanonicalField, String> {
    fn from(mapping: ColumnMapping) -> Self {
        mapping.columns
    }
}

impl ColumnMapping {
    /// Source header for a canonical field.
    pub fn source(&self, field: CanonicalField) -> &str {
        self.columns
            .get(&field)
            .map(String::as_str)
            .unwrap_or_else(|| field.default_column())
    }

    pub fn set(&mut self, field: CanonicalField, column: impl Into<String>) {
        self.columns.insert(field, column.into().trim().to_string());
    }

    /// Canonical fields whose source column appears in `headers`.
    pub fn present_fields(&self, headers: &[String]) -> Vec<CanonicalField> {
        CanonicalField::ALL
            .iter()
            .copied()
            .filter(|f| headers.iter().any(|h| h == self.source(*f)))
            .collect()
    }

    /// Fail on the first required field whose column is missing.
    pub fn check_required(&self, headers: &[String]) -> SellerInsightResult<()> {
        let present = self.present_fields(headers);
        for field in CanonicalField::REQUIRED {
            if !present.contains(&field) {
                return Err(SellerInsightError::MissingColumn {
                    field: field.to_string(),
                    column: self.source(field).to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> SellerInsightResult<()> {
        for field in CanonicalField::ALL {
            if self.source(field).is_empty() {
                return Err(SellerInsightError::InvalidInput {
                    field: format!("columns.{field}"),
                    reason: "Column header must not be empty".into(),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
