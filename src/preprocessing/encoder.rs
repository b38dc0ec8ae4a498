//! Categorical encoding implementations
//!
//! Nominal columns and the ordinal `Vehicle_Age` column deliberately treat
//! unknown values differently: a nominal value never seen during fitting is
//! encoded as [`UNSEEN_CODE`], while an unmapped vehicle age falls back to
//! the `"1-2 Year"` code. The asymmetry is kept as is; whether the two were
//! meant to agree is undecided.

use super::{has_column, to_text};
use crate::error::Result;
use crate::schema;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Code of a nominal value absent from the fitted vocabulary
pub const UNSEEN_CODE: i64 = -1;

/// Closed vocabulary of a nominal column.
///
/// Codes follow the sorted order of the string values (0..n), so the same
/// training values always produce the same codes whatever their row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    codes: BTreeMap<String, i64>,
}

impl Vocabulary {
    /// Build a vocabulary from observed values
    pub fn fit<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let distinct: BTreeSet<&str> = values.into_iter().collect();
        let codes = distinct
            .into_iter()
            .enumerate()
            .map(|(idx, value)| (value.to_string(), idx as i64))
            .collect();
        Self { codes }
    }

    /// Build a vocabulary with explicit codes
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, i64)>) -> Self {
        Self {
            codes: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Code of a value; missing and unseen values map to [`UNSEEN_CODE`]
    pub fn encode(&self, value: Option<&str>) -> i64 {
        value
            .and_then(|v| self.codes.get(v).copied())
            .unwrap_or(UNSEEN_CODE)
    }

    pub fn code(&self, value: &str) -> Option<i64> {
        self.codes.get(value).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.codes.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Label encoder for nominal columns with an unseen-value sentinel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEncoder {
    vocabularies: BTreeMap<String, Vocabulary>,
}

impl CategoryEncoder {
    /// Build an encoder from known vocabularies
    pub fn from_vocabularies(vocabularies: BTreeMap<String, Vocabulary>) -> Self {
        Self { vocabularies }
    }

    /// Fit a vocabulary for each listed column present in the data
    pub fn fit(df: &DataFrame, columns: &[String]) -> Result<Self> {
        let mut vocabularies = BTreeMap::new();

        for col_name in columns {
            if !has_column(df, col_name) {
                debug!(column = %col_name, "Nominal column absent, no vocabulary fitted");
                continue;
            }
            let text = to_text(df.column(col_name)?.as_materialized_series())?;
            let vocabulary = Vocabulary::fit(text.into_iter().flatten());
            vocabularies.insert(col_name.clone(), vocabulary);
        }

        Ok(Self { vocabularies })
    }

    pub fn vocabulary(&self, column: &str) -> Option<&Vocabulary> {
        self.vocabularies.get(column)
    }

    pub fn vocabularies(&self) -> &BTreeMap<String, Vocabulary> {
        &self.vocabularies
    }

    /// Replace each fitted column with its Int64 codes
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut result = df.clone();

        for (col_name, vocabulary) in &self.vocabularies {
            if !has_column(df, col_name) {
                continue;
            }
            let text = to_text(df.column(col_name)?.as_materialized_series())?;

            let mut unseen = 0usize;
            let values: Vec<i64> = text
                .into_iter()
                .map(|v| {
                    let code = vocabulary.encode(v);
                    if code == UNSEEN_CODE {
                        unseen += 1;
                    }
                    code
                })
                .collect();

            if unseen > 0 {
                debug!(column = %col_name, unseen, "Unseen categories encoded as sentinel");
            }
            result.with_column(Series::new(col_name.as_str().into(), values))?;
        }

        Ok(result)
    }
}

/// Fixed ordinal mapping with a default code for unmapped values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdinalEncoder {
    column: String,
    mapping: BTreeMap<String, i64>,
    default_code: i64,
}

impl Default for OrdinalEncoder {
    fn default() -> Self {
        Self::vehicle_age()
    }
}

impl OrdinalEncoder {
    /// Create an ordinal encoder
    pub fn new<S: Into<String>>(
        column: impl Into<String>,
        mapping: impl IntoIterator<Item = (S, i64)>,
        default_code: i64,
    ) -> Self {
        Self {
            column: column.into(),
            mapping: mapping.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            default_code,
        }
    }

    /// The static `Vehicle_Age` mapping; unmapped values take the
    /// `"1-2 Year"` code
    pub fn vehicle_age() -> Self {
        Self::new(
            schema::VEHICLE_AGE,
            [("< 1 Year", 0), ("1-2 Year", 1), ("> 2 Years", 2)],
            1,
        )
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn default_code(&self) -> i64 {
        self.default_code
    }

    pub fn encode(&self, value: Option<&str>) -> i64 {
        value
            .and_then(|v| self.mapping.get(v).copied())
            .unwrap_or(self.default_code)
    }

    /// Replace the column with its Int64 ordinal codes
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !has_column(df, &self.column) {
            debug!(column = %self.column, "Ordinal column absent, skipping");
            return Ok(df.clone());
        }

        let text = to_text(df.column(&self.column)?.as_materialized_series())?;
        let values: Vec<i64> = text.into_iter().map(|v| self.encode(v)).collect();

        let mut result = df.clone();
        result.with_column(Series::new(self.column.as_str().into(), values))?;
        Ok(result)
    }
}
