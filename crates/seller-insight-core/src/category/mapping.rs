use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::error::SellerInsightError;
use crate::SellerInsightResult;

/// Label prefix for codes missing from the mapping table.
pub const UNCLASSIFIED_PREFIX: &str = "unclassified_";

#[derive(Debug, Deserialize)]
struct MappingRow {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Name")]
    name: String,
}

/// Read-only category code → display name table, loaded once per run.
#[derive(Debug, Clone, Default)]
pub struct CategoryMapping {
    names: HashMap<String, String>,
}

impl CategoryMapping {
    pub fn new(names: HashMap<String, String>) -> Self {
        let names = names
            .into_iter()
            .map(|(code, name)| (normalize_code(&code), name.trim().to_string()))
            .filter(|(code, name)| !code.is_empty() && !name.is_empty())
            .collect();
        CategoryMapping { names }
    }

    /// Load a `Code,Name` CSV table.
    pub fn from_reader<R: Read>(reader: R) -> SellerInsightResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut names = HashMap::new();
        for (line_num, result) in csv_reader.deserialize().enumerate() {
            let row: MappingRow = result.map_err(|e| {
                SellerInsightError::Csv(format!(
                    "category mapping parse error at line {}: {}",
                    line_num + 2,
                    e
                ))
            })?;
            names.insert(row.code, row.name);
        }

        Ok(CategoryMapping::new(names))
    }

    pub fn from_file(path: impl AsRef<Path>) -> SellerInsightResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            SellerInsightError::Io(format!("Failed to open '{}': {}", path.display(), e))
        })?;
        let mapping = Self::from_reader(file)?;
        info!(path = %path.display(), entries = mapping.len(), "loaded category mapping");
        Ok(mapping)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Display name for a raw category cell.
    ///
    /// Blank cells resolve to `None`; codes missing from the table resolve to
    /// `unclassified_<code>` so their volume still shows up in aggregates.
    pub fn resolve(&self, raw_code: &str) -> Option<String> {
        let code = normalize_code(raw_code);
        if code.is_empty() || code.eq_ignore_ascii_case("nan") {
            return None;
        }
        Some(
            self.names
                .get(&code)
                .cloned()
                .unwrap_or_else(|| format!("{UNCLASSIFIED_PREFIX}{code}")),
        )
    }
}

/// Spreadsheet exports turn integer codes into `"1203.0"`.
fn normalize_code(raw: &str) -> String {
    let code = raw.trim();
    match code.strip_suffix(".0") {
        Some(int_part) if !int_part.is_empty() && int_part.chars().all(|c| c.is_ascii_digit()) => {
            int_part.to_string()
        }
        _ => code.to_string(),
    }
}
