//! Preprocessing configuration

use crate::error::{PrepError, Result};
use crate::schema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Inclusive numeric range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosedRange {
    pub lower: f64,
    pub upper: f64,
}

impl ClosedRange {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Configuration for fitting the preprocessing pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Age bucket boundaries; n edges give n - 1 buckets
    pub age_edges: Vec<f64>,

    /// Ages kept by the train-only range filter
    pub valid_age_range: ClosedRange,

    /// Quantile of Annual_Premium above which training rows are dropped
    pub outlier_quantile: f64,

    /// Quantiles of Annual_Premium used as premium bucket boundaries
    pub premium_quantiles: Vec<f64>,

    /// Columns standardized with train-time mean and scale
    pub scaled_columns: Vec<String>,

    /// Nominal columns label-encoded with a closed vocabulary
    pub nominal_columns: Vec<String>,

    /// Label column, never imputed or scaled
    pub label_column: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            age_edges: vec![18.0, 25.0, 35.0, 50.0, 65.0, 100.0],
            valid_age_range: ClosedRange::new(18.0, 100.0),
            outlier_quantile: 0.999,
            premium_quantiles: vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0],
            scaled_columns: [
                schema::AGE,
                schema::ANNUAL_PREMIUM,
                schema::VINTAGE,
                schema::REGION_CODE,
                schema::POLICY_SALES_CHANNEL,
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            nominal_columns: vec![schema::GENDER.to_string(), schema::VEHICLE_DAMAGE.to_string()],
            label_column: schema::RESPONSE.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file; missing keys take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Builder method to set age bucket edges
    pub fn with_age_edges(mut self, edges: Vec<f64>) -> Self {
        self.age_edges = edges;
        self
    }

    /// Builder method to set the valid age range
    pub fn with_valid_age_range(mut self, lower: f64, upper: f64) -> Self {
        self.valid_age_range = ClosedRange::new(lower, upper);
        self
    }

    /// Builder method to set the outlier quantile
    pub fn with_outlier_quantile(mut self, quantile: f64) -> Self {
        self.outlier_quantile = quantile;
        self
    }

    /// Builder method to set the premium bucket quantiles
    pub fn with_premium_quantiles(mut self, quantiles: Vec<f64>) -> Self {
        self.premium_quantiles = quantiles;
        self
    }

    /// Builder method to set the standardized columns
    pub fn with_scaled_columns(mut self, columns: &[&str]) -> Self {
        self.scaled_columns = columns.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Check that edges and quantiles describe usable buckets
    pub fn validate(&self) -> Result<()> {
        check_edges("age_edges", &self.age_edges)?;

        if self.valid_age_range.lower > self.valid_age_range.upper {
            return Err(PrepError::InvalidParameter {
                name: "valid_age_range".to_string(),
                value: format!("{:?}", self.valid_age_range),
                reason: "lower bound exceeds upper bound".to_string(),
            });
        }

        if !(self.outlier_quantile > 0.0 && self.outlier_quantile <= 1.0) {
            return Err(PrepError::InvalidParameter {
                name: "outlier_quantile".to_string(),
                value: self.outlier_quantile.to_string(),
                reason: "must lie in (0, 1]".to_string(),
            });
        }

        check_edges("premium_quantiles", &self.premium_quantiles)?;
        if self.premium_quantiles.iter().any(|q| !(0.0..=1.0).contains(q)) {
            return Err(PrepError::InvalidParameter {
                name: "premium_quantiles".to_string(),
                value: format!("{:?}", self.premium_quantiles),
                reason: "quantiles must lie in [0, 1]".to_string(),
            });
        }

        Ok(())
    }
}

fn check_edges(name: &str, edges: &[f64]) -> Result<()> {
    if edges.len() < 2 {
        return Err(PrepError::InvalidParameter {
            name: name.to_string(),
            value: format!("{:?}", edges),
            reason: "at least two edges are required".to_string(),
        });
    }
    if !edges.windows(2).all(|w| w[0] < w[1]) {
        return Err(PrepError::InvalidParameter {
            name: name.to_string(),
            value: format!("{:?}", edges),
            reason: "edges must be strictly increasing".to_string(),
        });
    }
    Ok(())
}
