use thiserror::Error;

#[derive(Debug, Error)]
pub enum SellerInsightError {
    #[error("Missing required column: {column} (canonical field: {field})")]
    MissingColumn { field: String, column: String },

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Seller not found: {0}")]
    SellerNotFound(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for SellerInsightError {
    fn from(e: serde_json::Error) -> Self {
        SellerInsightError::SerializationError(e.to_string())
    }
}

impl From<csv::Error> for SellerInsightError {
    fn from(e: csv::Error) -> Self {
        SellerInsightError::Csv(e.to_string())
    }
}

impl From<std::io::Error> for SellerInsightError {
    fn from(e: std::io::Error) -> Self {
        SellerInsightError::Io(e.to_string())
    }
}
