//! Median imputation of missing numeric values

use super::{has_column, is_numeric_dtype, present_values, to_float, CodeExtractor};
use crate::error::Result;
use crate::schema;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Per-column medians learned from the training partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedianImputer {
    medians: BTreeMap<String, f64>,
}

impl MedianImputer {
    /// Build an imputer from known medians
    pub fn from_medians(medians: BTreeMap<String, f64>) -> Self {
        Self { medians }
    }

    /// Learn the median of every numeric column not listed in `excluded`.
    ///
    /// The label and the categorical columns belong in `excluded`: a
    /// numeric-coded category rewritten as Float64 would no longer match
    /// its vocabulary. Code columns that arrive as text get the median of
    /// their extracted codes, so later re-imputation of failed extractions
    /// has a value.
    pub fn fit<S: AsRef<str>>(df: &DataFrame, excluded: &[S]) -> Result<Self> {
        let extractor = CodeExtractor::new();
        let mut medians = BTreeMap::new();

        for column in df.get_columns() {
            let name = column.name().as_str();
            if excluded.iter().any(|e| e.as_ref() == name) {
                continue;
            }
            let series = column.as_materialized_series();

            let values = if is_numeric_dtype(series.dtype()) {
                to_float(series)?
            } else if schema::CODE_COLUMNS.contains(&name) {
                extractor.extract_series(series)?
            } else {
                continue;
            };

            match median(&present_values(&values)) {
                Some(m) => {
                    medians.insert(name.to_string(), m);
                }
                None => debug!(column = %name, "No present values, no median stored"),
            }
        }

        Ok(Self { medians })
    }

    /// Median stored for a column
    pub fn median(&self, column: &str) -> Option<f64> {
        self.medians.get(column).copied()
    }

    pub fn medians(&self) -> &BTreeMap<String, f64> {
        &self.medians
    }

    /// Replace missing values in every numeric column that has a median.
    /// Text columns are left for code extraction.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut result = df.clone();

        for (col_name, &median) in &self.medians {
            if !has_column(df, col_name) {
                continue;
            }
            let series = df.column(col_name)?.as_materialized_series();
            if !(is_numeric_dtype(series.dtype()) || series.dtype() == &DataType::Null) {
                continue;
            }
            let filled = self.fill(series, median)?;
            result.with_column(filled)?;
        }

        Ok(result)
    }

    /// Fill nulls and NaNs of a series with a value, as Float64
    pub fn fill(&self, series: &Series, value: f64) -> Result<Series> {
        let ca = to_float(series)?;

        let filled: Float64Chunked = ca
            .into_iter()
            .map(|opt| match opt {
                Some(v) if !v.is_nan() => Some(v),
                _ => Some(value),
            })
            .collect();

        Ok(filled.with_name(series.name().clone()).into_series())
    }
}

/// Median of unsorted values; the mean of the two middle values for an
/// even count
pub(crate) fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_fit_skips_label_and_text() {
        let df = df!(
            "Age" => &[Some(20i64), None, Some(40), Some(60)],
            "Gender" => &["Male", "Female", "Male", "Male"],
            "Response" => &[0i64, 1, 0, 1],
        )
        .unwrap();

        let imputer = MedianImputer::fit(&df, &["Response"]).unwrap();
        assert_eq!(imputer.median("Age"), Some(40.0));
        assert_eq!(imputer.median("Gender"), None);
        assert_eq!(imputer.median("Response"), None);
    }

    #[test]
    fn test_fit_skips_excluded_numeric_columns() {
        let df = df!(
            "Gender" => &[1i64, 0, 1, 0],
            "Vehicle_Damage" => &[Some(1i64), None, Some(0), Some(1)],
            "Vintage" => &[10i64, 20, 30, 40],
        )
        .unwrap();

        let imputer = MedianImputer::fit(&df, &["Response", "Gender", "Vehicle_Damage"]).unwrap();
        assert_eq!(imputer.median("Gender"), None);
        assert_eq!(imputer.median("Vehicle_Damage"), None);
        assert_eq!(imputer.median("Vintage"), Some(25.0));

        let result = imputer.transform(&df).unwrap();
        assert_eq!(result.column("Gender").unwrap().dtype(), &DataType::Int64);
        assert_eq!(result.column("Vehicle_Damage").unwrap().null_count(), 1);
    }

    #[test]
    fn test_fit_text_code_column_uses_extracted_codes() {
        let df = df!("Region_Code" => &["R10", "R30", "x", "R20"]).unwrap();
        let imputer = MedianImputer::fit(&df, &["Response"]).unwrap();
        assert_eq!(imputer.median("Region_Code"), Some(20.0));
    }

    #[test]
    fn test_median_imputation() {
        let df = df!(
            "Annual_Premium" => &[Some(1000.0), None, Some(3000.0), Some(2000.0)],
        )
        .unwrap();

        let imputer = MedianImputer::fit(&df, &["Response"]).unwrap();
        let result = imputer.transform(&df).unwrap();

        let col = result.column("Annual_Premium").unwrap().f64().unwrap();
        assert_eq!(col.get(1), Some(2000.0));
        assert_eq!(col.null_count(), 0);
    }

    #[test]
    fn test_transform_leaves_text_columns() {
        let mut medians = BTreeMap::new();
        medians.insert("Region_Code".to_string(), 28.0);
        let imputer = MedianImputer::from_medians(medians);

        let df = df!("Region_Code" => &[Some("R3"), None]).unwrap();
        let result = imputer.transform(&df).unwrap();
        assert_eq!(result.column("Region_Code").unwrap().dtype(), &DataType::String);
    }
}
