//! Ingestion boundary and row normalization.

pub mod columns;
pub mod customer;
pub mod loader;
pub mod normalizer;
pub mod parse;
pub mod record;
pub mod region;

pub use columns::{CanonicalField, ColumnMapping};
pub use loader::{load_orders, load_orders_file, LoadSummary};
pub use normalizer::{normalize_row, RawRow};
pub use record::{CanonicalRecord, Dataset, DatasetFingerprint};
