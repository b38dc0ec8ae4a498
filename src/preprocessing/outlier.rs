//! Train-only row removal
//!
//! Two filters run only on the partition the bundle was fitted on:
//! premium outliers above a high training quantile, and ages outside the
//! valid range. Held-out data is never filtered.

use super::binning::quantile;
use super::{has_column, present_values, to_float, ClosedRange};
use crate::error::Result;
use crate::schema;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Fitted bounds for the train-only filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowFilter {
    /// Annual_Premium values above this are outliers
    premium_threshold: Option<f64>,
    valid_age_range: ClosedRange,
}

impl RowFilter {
    /// Create a filter with known bounds
    pub fn new(premium_threshold: Option<f64>, valid_age_range: ClosedRange) -> Self {
        Self {
            premium_threshold,
            valid_age_range,
        }
    }

    /// Learn the premium threshold as a quantile of the training premiums
    pub fn fit(df: &DataFrame, outlier_quantile: f64, valid_age_range: ClosedRange) -> Result<Self> {
        let premium_threshold = if has_column(df, schema::ANNUAL_PREMIUM) {
            let premiums = to_float(df.column(schema::ANNUAL_PREMIUM)?.as_materialized_series())?;
            let mut values = present_values(&premiums);
            values.sort_by(|a, b| a.total_cmp(b));
            quantile(&values, outlier_quantile)
        } else {
            None
        };

        Ok(Self::new(premium_threshold, valid_age_range))
    }

    pub fn premium_threshold(&self) -> Option<f64> {
        self.premium_threshold
    }

    pub fn valid_age_range(&self) -> ClosedRange {
        self.valid_age_range
    }

    /// Drop rows whose Annual_Premium exceeds the fitted threshold
    pub fn drop_premium_outliers(&self, df: &DataFrame) -> Result<DataFrame> {
        let threshold = match self.premium_threshold {
            Some(t) if has_column(df, schema::ANNUAL_PREMIUM) => t,
            _ => {
                debug!("No premium threshold or column, skipping outlier removal");
                return Ok(df.clone());
            }
        };

        let premiums = to_float(df.column(schema::ANNUAL_PREMIUM)?.as_materialized_series())?;
        let keep: Vec<bool> = premiums
            .into_iter()
            .map(|v| !matches!(v, Some(p) if p > threshold))
            .collect();

        self.apply_mask(df, &keep, "premium outliers")
    }

    /// Drop rows whose Age lies outside the valid range; rows with a
    /// missing Age are kept
    pub fn drop_invalid_ages(&self, df: &DataFrame) -> Result<DataFrame> {
        if !has_column(df, schema::AGE) {
            debug!("Age column absent, skipping range filter");
            return Ok(df.clone());
        }

        let ages = to_float(df.column(schema::AGE)?.as_materialized_series())?;
        let keep: Vec<bool> = ages
            .into_iter()
            .map(|v| match v {
                Some(age) if !age.is_nan() => self.valid_age_range.contains(age),
                _ => true,
            })
            .collect();

        self.apply_mask(df, &keep, "ages out of range")
    }

    fn apply_mask(&self, df: &DataFrame, keep: &[bool], reason: &str) -> Result<DataFrame> {
        let mask = BooleanChunked::new("keep".into(), keep);
        let filtered = df.filter(&mask)?;

        let dropped = df.height() - filtered.height();
        if dropped > 0 {
            info!(dropped, remaining = filtered.height(), "Removed training rows: {}", reason);
        }
        Ok(filtered)
    }
}
