//! Numeric-code extraction for columns whose value may be embedded in text
//!
//! `Region_Code` and `Policy_Sales_Channel` arrive as numbers (`28.0`) or as
//! strings carrying a number (`"R28"`, `"152.0"`). The first run of ASCII
//! digits is the code; a value without one becomes missing and is re-imputed
//! with the train-time median.

use super::{has_column, to_text, MedianImputer};
use crate::error::Result;
use crate::schema;
use polars::prelude::*;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Compiled once per process
static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digit-run pattern is valid"));

/// Extracts the first digit run of each value as a Float64 code
#[derive(Debug, Clone)]
pub struct CodeExtractor {
    pattern: &'static Regex,
    columns: Vec<String>,
}

impl Default for CodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeExtractor {
    /// Create an extractor for the record's code columns
    pub fn new() -> Self {
        Self::for_columns(&schema::CODE_COLUMNS)
    }

    /// Create an extractor for specific columns
    pub fn for_columns(columns: &[&str]) -> Self {
        Self {
            pattern: &DIGIT_RUN,
            columns: columns.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Code carried by a single value, if any
    pub fn extract_value(&self, value: &str) -> Option<f64> {
        self.pattern
            .find(value)
            .and_then(|m| m.as_str().parse::<f64>().ok())
    }

    /// Extract codes from a series of any dtype
    pub fn extract_series(&self, series: &Series) -> Result<Float64Chunked> {
        let text = to_text(series)?;
        let codes: Float64Chunked = text
            .into_iter()
            .map(|opt| opt.and_then(|s| self.extract_value(s)))
            .collect();
        Ok(codes.with_name(series.name().clone()))
    }

    /// Replace every code column with its extracted codes, re-imputing
    /// missing results from the imputer's medians
    pub fn transform(&self, df: &DataFrame, imputer: &MedianImputer) -> Result<DataFrame> {
        let mut result = df.clone();

        for col_name in &self.columns {
            if !has_column(df, col_name) {
                debug!(column = %col_name, "Code column absent, skipping extraction");
                continue;
            }
            let series = df.column(col_name)?.as_materialized_series();
            let codes = self.extract_series(series)?;
            let missing = codes.null_count();

            let filled = match imputer.median(col_name) {
                Some(median) => imputer.fill(&codes.into_series(), median)?,
                None => codes.into_series(),
            };
            if missing > 0 {
                debug!(column = %col_name, missing, "Values without a digit run re-imputed");
            }
            result.with_column(filled)?;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_extract_value() {
        let extractor = CodeExtractor::new();
        assert_eq!(extractor.extract_value("R28"), Some(28.0));
        assert_eq!(extractor.extract_value("152.0"), Some(152.0));
        assert_eq!(extractor.extract_value("code 7 and 9"), Some(7.0));
        assert_eq!(extractor.extract_value("unknown"), None);
        assert_eq!(extractor.extract_value(""), None);
    }

    #[test]
    fn test_extract_numeric_series() {
        let extractor = CodeExtractor::new();
        let s = Series::new("Region_Code".into(), &[28.0, 3.0, 41.0]);
        let codes = extractor.extract_series(&s).unwrap();
        assert_eq!(codes.get(0), Some(28.0));
        assert_eq!(codes.get(1), Some(3.0));
        assert_eq!(codes.get(2), Some(41.0));
    }

    #[test]
    fn test_transform_reimputes_with_median() {
        let df = df!(
            "Region_Code" => &["R28", "none", "8"],
            "Policy_Sales_Channel" => &[Some(152.0), None, Some(26.0)],
        )
        .unwrap();

        let mut medians = BTreeMap::new();
        medians.insert("Region_Code".to_string(), 18.0);
        medians.insert("Policy_Sales_Channel".to_string(), 124.0);
        let imputer = MedianImputer::from_medians(medians);

        let extractor = CodeExtractor::new();
        let result = extractor.transform(&df, &imputer).unwrap();

        let region = result.column("Region_Code").unwrap().f64().unwrap();
        assert_eq!(region.get(0), Some(28.0));
        assert_eq!(region.get(1), Some(18.0));
        assert_eq!(region.get(2), Some(8.0));

        let channel = result.column("Policy_Sales_Channel").unwrap().f64().unwrap();
        assert_eq!(channel.get(1), Some(124.0));
        assert_eq!(channel.null_count(), 0);
    }

    #[test]
    fn test_for_columns_limits_extraction() {
        let extractor = CodeExtractor::for_columns(&["Region_Code"]);
        assert_eq!(extractor.columns(), &["Region_Code".to_string()]);
        assert_eq!(CodeExtractor::default().columns().len(), 2);

        let df = df!(
            "Region_Code" => &["R28"],
            "Policy_Sales_Channel" => &["C152"],
        )
        .unwrap();
        let result = extractor
            .transform(&df, &MedianImputer::from_medians(BTreeMap::new()))
            .unwrap();
        assert_eq!(result.column("Region_Code").unwrap().f64().unwrap().get(0), Some(28.0));
        assert_eq!(result.column("Policy_Sales_Channel").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_transform_skips_absent_columns() {
        let df = df!("Age" => &[30i64, 40]).unwrap();
        let extractor = CodeExtractor::new();
        let result = extractor
            .transform(&df, &MedianImputer::from_medians(BTreeMap::new()))
            .unwrap();
        assert_eq!(result.width(), 1);
    }
}
