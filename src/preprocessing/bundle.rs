//! The fitted parameter bundle
//!
//! A bundle is produced once per training run by [`Fitter`](super::Fitter)
//! and only ever read afterwards. It holds every statistic and encoder the
//! [`Applier`](super::Applier) needs, so applying never looks at anything but
//! the bundle and the data in hand. Retraining replaces the whole bundle.

use super::{Binner, CategoryEncoder, MedianImputer, OrdinalEncoder, RowFilter, Scaler};
use crate::error::{PrepError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Version of the persisted bundle layout
pub const BUNDLE_FORMAT_VERSION: u32 = 1;

/// Statistics and encoders learned from a training partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterBundle {
    pub(crate) format_version: u32,
    /// Rows in the training partition the bundle was fitted on
    pub(crate) fitted_rows: usize,
    pub(crate) label_column: String,
    pub(crate) imputer: MedianImputer,
    pub(crate) encoder: CategoryEncoder,
    pub(crate) ordinal: OrdinalEncoder,
    pub(crate) filter: RowFilter,
    pub(crate) binner: Binner,
    pub(crate) scaler: Scaler,
}

impl ParameterBundle {
    pub fn fitted_rows(&self) -> usize {
        self.fitted_rows
    }

    pub fn label_column(&self) -> &str {
        &self.label_column
    }

    pub fn imputer(&self) -> &MedianImputer {
        &self.imputer
    }

    pub fn encoder(&self) -> &CategoryEncoder {
        &self.encoder
    }

    pub fn ordinal(&self) -> &OrdinalEncoder {
        &self.ordinal
    }

    pub fn filter(&self) -> &RowFilter {
        &self.filter
    }

    pub fn binner(&self) -> &Binner {
        &self.binner
    }

    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON, rejecting other layout versions
    pub fn from_json(json: &str) -> Result<Self> {
        let bundle: Self = serde_json::from_str(json)?;
        if bundle.format_version != BUNDLE_FORMAT_VERSION {
            return Err(PrepError::IncompatibleBundle {
                found: bundle.format_version,
                expected: BUNDLE_FORMAT_VERSION,
            });
        }
        Ok(bundle)
    }

    /// Save the bundle to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), "Saved parameter bundle");
        Ok(())
    }

    /// Load a bundle from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let bundle = Self::from_json(&json)?;
        info!(path = %path.display(), fitted_rows = bundle.fitted_rows, "Loaded parameter bundle");
        Ok(bundle)
    }
}
