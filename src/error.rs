//! Error types for the statgenex library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum StatgenexError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Group '{name}' has not been built")]
    MissingGroup { name: String },

    #[error("Invalid filter specification: {0}")]
    InvalidFilterSpec(String),

    #[error("Missing column '{0}' in annotation table")]
    MissingColumn(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Sample ID mismatch: {0}")]
    SampleMismatch(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, StatgenexError>;
