//! Fitting a parameter bundle on a training partition

use super::{
    Applier, ApplyMode, Binner, CategoryEncoder, MedianImputer, OrdinalEncoder, ParameterBundle,
    PipelineConfig, RowFilter, Scaler, BUNDLE_FORMAT_VERSION,
};
use crate::error::{PrepError, Result};
use polars::prelude::*;
use std::time::Instant;
use tracing::{info, warn};

/// Learns a [`ParameterBundle`] from training data
#[derive(Debug, Clone, Default)]
pub struct Fitter {
    config: PipelineConfig,
}

impl Fitter {
    /// Create a fitter with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fitter with a custom configuration
    pub fn with_config(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Scan the training partition once and return its bundle.
    ///
    /// Columns the data lacks are skipped. The scaler is fitted last, on the
    /// training partition already passed through the other fitted steps in
    /// train mode, so the processed training set is exactly standardized.
    pub fn fit(&self, train: &DataFrame) -> Result<ParameterBundle> {
        let start = Instant::now();

        if train.height() == 0 {
            return Err(PrepError::EmptyDataset(
                "cannot fit a parameter bundle on a dataset without rows".to_string(),
            ));
        }

        let config = &self.config;
        let ordinal = OrdinalEncoder::vehicle_age();

        // Categorical columns keep their raw form until the encoders run
        let mut excluded = vec![config.label_column.as_str(), ordinal.column()];
        excluded.extend(config.nominal_columns.iter().map(String::as_str));

        let mut bundle = ParameterBundle {
            format_version: BUNDLE_FORMAT_VERSION,
            fitted_rows: train.height(),
            label_column: config.label_column.clone(),
            imputer: MedianImputer::fit(train, &excluded)?,
            encoder: CategoryEncoder::fit(train, &config.nominal_columns)?,
            ordinal,
            filter: RowFilter::fit(train, config.outlier_quantile, config.valid_age_range)?,
            binner: Binner::fit(train, config.age_edges.clone(), &config.premium_quantiles)?,
            scaler: Scaler::default(),
        };

        let prepared = Applier::new(&bundle).prepare(train, ApplyMode::Train)?;
        bundle.scaler = Scaler::fit(&prepared, &config.scaled_columns)?;
        if bundle.scaler.is_empty() {
            warn!(columns = ?config.scaled_columns, "None of the scaled columns are present, output is unscaled");
        }

        info!(
            rows = train.height(),
            medians = bundle.imputer.medians().len(),
            vocabularies = bundle.encoder.vocabularies().len(),
            scaled = bundle.scaler.columns().count(),
            premium_threshold = ?bundle.filter.premium_threshold(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fitted parameter bundle"
        );
        Ok(bundle)
    }

    /// Fit on the training partition and return its processed form as well
    pub fn fit_apply(&self, train: &DataFrame) -> Result<(ParameterBundle, DataFrame)> {
        let bundle = self.fit(train)?;
        let processed = Applier::new(&bundle).apply_train(train)?;
        Ok((bundle, processed))
    }
}
