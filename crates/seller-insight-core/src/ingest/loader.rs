//! CSV order-list loader.
//!
//! This is the ingestion boundary: missing required columns, empty inputs
//! and malformed CSV are reported here so the benchmarking code only ever
//! sees datasets that satisfy the canonical-record invariants.

use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use super::columns::ColumnMapping;
use super::normalizer::{normalize_row, RawRow};
use super::record::Dataset;
use crate::category::CategoryMapping;
use crate::error::SellerInsightError;
use crate::SellerInsightResult;

/// Counts reported alongside a loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_discarded: usize,
}

/// Load an order list from a CSV reader.
pub fn load_orders<R: Read>(
    reader: R,
    columns: &ColumnMapping,
    categories: &CategoryMapping,
) -> SellerInsightResult<(Dataset, LoadSummary)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    columns.check_required(&headers)?;
    let fields = columns.present_fields(&headers);
    debug!(?fields, "resolved source columns");

    let mut records = Vec::new();
    let mut rows_read = 0usize;
    for (line_num, result) in csv_reader.records().enumerate() {
        let row = result.map_err(|e| {
            SellerInsightError::Csv(format!("parse error at line {}: {}", line_num + 2, e))
        })?;
        rows_read += 1;

        let raw: RawRow = headers
            .iter()
            .zip(row.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        if let Some(record) = normalize_row(&raw, columns, categories) {
            records.push(record);
        }
    }

    if rows_read == 0 {
        return Err(SellerInsightError::EmptyDataset(
            "input contains a header but no order rows".into(),
        ));
    }
    if records.is_empty() {
        return Err(SellerInsightError::EmptyDataset(
            "no row has both a valid payment date and order amount".into(),
        ));
    }

    let summary = LoadSummary {
        rows_read,
        rows_kept: records.len(),
        rows_discarded: rows_read - records.len(),
    };
    if summary.rows_discarded > 0 {
        warn!(
            discarded = summary.rows_discarded,
            "dropped rows without a valid payment date or amount"
        );
    }
    info!(rows = summary.rows_kept, "loaded order list");

    Ok((Dataset::new(records, fields), summary))
}

/// Load an order list from a CSV file path.
pub fn load_orders_file(
    path: impl AsRef<Path>,
    columns: &ColumnMapping,
    categories: &CategoryMapping,
) -> SellerInsightResult<(Dataset, LoadSummary)> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| {
        SellerInsightError::Io(format!("Failed to open '{}': {}", path.display(), e))
    })?;
    load_orders(file, columns, categories)
}
