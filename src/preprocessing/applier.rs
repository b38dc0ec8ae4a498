//! Applying a fitted bundle to a partition

use super::{has_column, CodeExtractor, ParameterBundle};
use crate::error::{PrepError, Result};
use crate::schema;
use polars::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

/// Which partition is being transformed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// The partition the bundle was fitted on; outlier and range rows are removed
    Train,
    /// Held-out data; every row is kept
    Eval,
}

impl ApplyMode {
    /// Whether the train-only row filters run
    pub fn removes_rows(self) -> bool {
        matches!(self, ApplyMode::Train)
    }
}

/// Transforms partitions with a borrowed, read-only bundle
#[derive(Debug, Clone, Copy)]
pub struct Applier<'a> {
    bundle: &'a ParameterBundle,
}

impl<'a> Applier<'a> {
    pub fn new(bundle: &'a ParameterBundle) -> Self {
        Self { bundle }
    }

    pub fn bundle(&self) -> &'a ParameterBundle {
        self.bundle
    }

    /// Transform the training partition, removing outlier and invalid-age rows
    pub fn apply_train(&self, df: &DataFrame) -> Result<DataFrame> {
        self.apply(df, ApplyMode::Train)
    }

    /// Transform held-out data; the row count is preserved
    pub fn apply_eval(&self, df: &DataFrame) -> Result<DataFrame> {
        self.apply(df, ApplyMode::Eval)
    }

    /// Run every step, ending with standardization
    pub fn apply(&self, df: &DataFrame, mode: ApplyMode) -> Result<DataFrame> {
        let start = Instant::now();

        let prepared = self.prepare(df, mode)?;
        let result = self.bundle.scaler.transform(&prepared)?;

        info!(
            mode = ?mode,
            rows_in = df.height(),
            rows_out = result.height(),
            columns = result.width(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Applied parameter bundle"
        );
        Ok(result)
    }

    /// Every step before standardization. The input is never modified.
    pub(crate) fn prepare(&self, df: &DataFrame, mode: ApplyMode) -> Result<DataFrame> {
        if df.height() == 0 {
            return Err(PrepError::EmptyDataset(format!(
                "cannot apply parameter bundle in {:?} mode to a dataset without rows",
                mode
            )));
        }
        let bundle = self.bundle;

        let result = bundle.imputer.transform(df)?;
        let result = bundle.encoder.transform(&result)?;
        let result = bundle.ordinal.transform(&result)?;
        let result = CodeExtractor::new().transform(&result, &bundle.imputer)?;

        let result = if mode.removes_rows() {
            let result = bundle.filter.drop_premium_outliers(&result)?;
            bundle.filter.drop_invalid_ages(&result)?
        } else {
            result
        };

        let mut result = bundle.binner.transform(&result)?;

        if has_column(&result, schema::ID) {
            result = result.drop(schema::ID)?;
        } else {
            debug!("No id column to drop");
        }

        Ok(result)
    }
}
