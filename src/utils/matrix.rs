//! Export of a processed dataset to dense arrays for the classifier

use crate::error::{PrepError, Result};
use polars::prelude::*;
use ndarray::{Array1, Array2};

/// Row-major feature matrix with optional labels
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub features: Array2<f64>,
    pub labels: Option<Array1<f64>>,
    pub feature_names: Vec<String>,
}

impl FeatureMatrix {
    /// Split a processed dataset into features and the label column.
    ///
    /// Every column other than the label becomes a feature; missing values
    /// become NaN.
    pub fn from_frame(df: &DataFrame, label_column: &str) -> Result<Self> {
        let feature_names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .filter(|name| name.as_str() != label_column)
            .map(|s| s.to_string())
            .collect();

        if feature_names.is_empty() {
            return Err(PrepError::ShapeError {
                expected: "at least one feature column".to_string(),
                actual: format!("{} columns", df.width()),
            });
        }

        let col_data: Vec<Vec<f64>> = feature_names
            .iter()
            .map(|name| column_values(df, name))
            .collect::<Result<Vec<_>>>()?;

        let n_rows = df.height();
        let features = Array2::from_shape_fn((n_rows, feature_names.len()), |(r, c)| col_data[c][r]);

        let labels = if df.get_column_index(label_column).is_some() {
            Some(Array1::from_vec(column_values(df, label_column)?))
        } else {
            None
        };

        Ok(Self {
            features,
            labels,
            feature_names,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }
}

fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df.column(name)?.cast(&DataType::Float64)?;
    Ok(series
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}
