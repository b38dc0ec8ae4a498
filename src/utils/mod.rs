//! Ingestion, export and hand-off helpers around the pipeline

pub mod data_loader;
mod matrix;

pub use data_loader::{validate_columns, write_csv, DataLoader, DEFAULT_MAX_ROWS};
pub use matrix::FeatureMatrix;
