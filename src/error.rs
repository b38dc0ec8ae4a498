//! Error types for the preprocessing pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PrepError>;

/// Main error type for the pipeline.
///
/// Only dataset-level structural problems surface here. Per-value anomalies
/// (unseen categories, unparsable codes, out-of-range buckets) are absorbed
/// by the step that meets them.
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Incompatible parameter bundle: format version {found}, expected {expected}")]
    IncompatibleBundle { found: u32, expected: u32 },

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },
}

impl From<polars::error::PolarsError> for PrepError {
    fn from(err: polars::error::PolarsError) -> Self {
        PrepError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for PrepError {
    fn from(err: serde_json::Error) -> Self {
        PrepError::SerializationError(err.to_string())
    }
}

impl From<regex::Error> for PrepError {
    fn from(err: regex::Error) -> Self {
        PrepError::ConfigError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for PrepError {
    fn from(err: ndarray::ShapeError) -> Self {
        PrepError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
