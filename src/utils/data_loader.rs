//! CSV ingestion and export

use crate::error::{PrepError, Result};
use crate::schema;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

/// Row cap applied when reading a file
pub const DEFAULT_MAX_ROWS: usize = 5_000_000;

/// Reads customer records from CSV files.
///
/// The whole file is materialized in memory, so a row cap bounds what a
/// single read can pull in.
#[derive(Debug, Clone)]
pub struct DataLoader {
    max_rows: Option<usize>,
    validate_schema: bool,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a new data loader
    pub fn new() -> Self {
        Self {
            max_rows: Some(DEFAULT_MAX_ROWS),
            validate_schema: true,
        }
    }

    /// Set the row cap; `None` reads every row
    pub fn with_max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Enable or disable the required-column check
    pub fn with_schema_validation(mut self, validate: bool) -> Self {
        self.validate_schema = validate;
        self
    }

    pub fn max_rows(&self) -> Option<usize> {
        self.max_rows
    }

    /// Load a CSV file, truncated to the row cap.
    ///
    /// Fails when a required column is missing (if validation is on). An
    /// absent label column is added and filled with
    /// [`MISSING_LABEL`](schema::MISSING_LABEL).
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let mut df = CsvReadOptions::default()
            .with_has_header(true)
            .with_n_rows(self.max_rows)
            .with_infer_schema_length(Some(10_000))
            .into_reader_with_file_handle(file)
            .finish()?;

        if let Some(cap) = self.max_rows {
            if df.height() == cap {
                warn!(path = %path.display(), cap, "Row cap reached, remaining rows ignored");
            }
        }

        if self.validate_schema {
            validate_columns(&df)?;
        }
        fill_missing_label(&mut df)?;

        info!(path = %path.display(), rows = df.height(), columns = df.width(), "Loaded CSV");
        Ok(df)
    }
}

/// Check that every required record column is present
pub fn validate_columns(df: &DataFrame) -> Result<()> {
    for column in schema::REQUIRED_COLUMNS {
        if df.get_column_index(column).is_none() {
            return Err(PrepError::MissingColumn(column.to_string()));
        }
    }
    Ok(())
}

fn fill_missing_label(df: &mut DataFrame) -> Result<()> {
    if df.get_column_index(schema::RESPONSE).is_none() {
        let labels = vec![schema::MISSING_LABEL; df.height()];
        df.with_column(Series::new(schema::RESPONSE.into(), labels))?;
    }
    Ok(())
}

/// Write a dataset as CSV with a header row
pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    info!(path = %path.display(), rows = df.height(), columns = df.width(), "Wrote CSV");
    Ok(())
}
