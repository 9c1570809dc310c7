pub mod benchmark;
pub mod category;
pub mod config;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod relative;
pub mod report;
pub mod types;

#[cfg(feature = "breakdowns")]
pub mod breakdown;

pub use error::SellerInsightError;
pub use types::*;

/// Standard result type for all seller-insight operations
pub type SellerInsightResult<T> = Result<T, SellerInsightError>;
