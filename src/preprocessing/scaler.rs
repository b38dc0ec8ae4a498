//! Feature standardization: (x - mean) / std with train-time statistics

use super::{has_column, present_values, to_float};
use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Parameters for a fitted column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: f64,
    /// Population standard deviation; 1.0 for a constant column
    pub scale: f64,
}

impl ScalerParams {
    pub fn scale_value(&self, value: f64) -> f64 {
        (value - self.mean) / self.scale
    }

    pub fn unscale_value(&self, value: f64) -> f64 {
        value * self.scale + self.mean
    }
}

/// Standard scaler over a set of numeric columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    params: BTreeMap<String, ScalerParams>,
}

impl Scaler {
    /// Build a scaler from known parameters
    pub fn from_params(params: BTreeMap<String, ScalerParams>) -> Self {
        Self { params }
    }

    /// Fit mean and population std for each listed column present
    pub fn fit(df: &DataFrame, columns: &[String]) -> Result<Self> {
        let mut params = BTreeMap::new();

        for col_name in columns {
            if !has_column(df, col_name) {
                debug!(column = %col_name, "Scaled column absent, not fitted");
                continue;
            }
            let values = present_values(&to_float(df.column(col_name)?.as_materialized_series())?);
            if values.is_empty() {
                debug!(column = %col_name, "No present values, not fitted");
                continue;
            }
            params.insert(col_name.clone(), compute_params(&values));
        }

        Ok(Self { params })
    }

    pub fn params(&self, column: &str) -> Option<&ScalerParams> {
        self.params.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(|k| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Transform the data.
    /// Builds all replacement columns first, then applies them in one pass.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let replacements: Vec<Series> = self
            .params
            .iter()
            .filter(|(col_name, _)| has_column(df, col_name))
            .map(|(col_name, params)| {
                let series = df.column(col_name)?.as_materialized_series();
                scale_series(series, params)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut result = df.clone();
        for scaled in replacements {
            result.with_column(scaled)?;
        }

        Ok(result)
    }

    /// Undo the scaling of every fitted column present
    pub fn inverse_transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut result = df.clone();

        for (col_name, params) in &self.params {
            if !has_column(df, col_name) {
                continue;
            }
            let ca = to_float(df.column(col_name)?.as_materialized_series())?;
            let unscaled: Float64Chunked = ca
                .into_iter()
                .map(|opt| opt.map(|v| params.unscale_value(v)))
                .collect();
            result.with_column(unscaled.with_name(col_name.as_str().into()).into_series())?;
        }

        Ok(result)
    }
}

fn compute_params(values: &[f64]) -> ScalerParams {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt();

    ScalerParams {
        mean,
        scale: if std == 0.0 { 1.0 } else { std },
    }
}

fn scale_series(series: &Series, params: &ScalerParams) -> Result<Series> {
    let ca = to_float(series)?;

    let scaled: Float64Chunked = ca
        .into_iter()
        .map(|opt| opt.map(|v| params.scale_value(v)))
        .collect();

    Ok(scaled.with_name(series.name().clone()).into_series())
}
