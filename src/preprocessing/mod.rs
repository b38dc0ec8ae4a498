//! Leak-free preprocessing of insurance customer records
//!
//! The pipeline is split into two explicit operations:
//! - [`Fitter`] scans a training partition once and emits a [`ParameterBundle`]
//! - [`Applier`] transforms any partition with a borrowed bundle, in
//!   [`ApplyMode::Train`] (with outlier and range row removal) or
//!   [`ApplyMode::Eval`] (row count preserved)
//!
//! Each fitted component of the bundle lives in its own module:
//! - Median imputation ([`MedianImputer`])
//! - Nominal and ordinal encoding ([`CategoryEncoder`], [`OrdinalEncoder`])
//! - Numeric-code extraction from strings ([`CodeExtractor`])
//! - Train-only row filters ([`RowFilter`])
//! - Age and premium bucketing ([`Binner`])
//! - Standardization ([`Scaler`])

mod applier;
mod bundle;
mod config;
mod encoder;
mod extract;
mod fitter;
mod imputer;
pub mod binning;
pub mod outlier;
mod scaler;

pub use applier::{Applier, ApplyMode};
pub use binning::Binner;
pub use bundle::{ParameterBundle, BUNDLE_FORMAT_VERSION};
pub use config::{ClosedRange, PipelineConfig};
pub use encoder::{CategoryEncoder, OrdinalEncoder, Vocabulary, UNSEEN_CODE};
pub use extract::CodeExtractor;
pub use fitter::Fitter;
pub use imputer::MedianImputer;
pub use outlier::RowFilter;
pub use scaler::{Scaler, ScalerParams};

use crate::error::Result;
use polars::prelude::*;

/// Check if dtype is numeric
pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

pub(crate) fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Coerce a series to Float64; unparsable strings become null
pub(crate) fn to_float(series: &Series) -> Result<Float64Chunked> {
    let casted = series.cast(&DataType::Float64)?;
    Ok(casted.f64()?.clone())
}

/// Coerce a series to its string form
pub(crate) fn to_text(series: &Series) -> Result<StringChunked> {
    let casted = series.cast(&DataType::String)?;
    Ok(casted.str()?.clone())
}

/// Non-missing, non-NaN values of a Float64 column
pub(crate) fn present_values(ca: &Float64Chunked) -> Vec<f64> {
    ca.into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_float_parses_strings() {
        let s = Series::new("a".into(), &["1.5", "x", "3"]);
        let ca = to_float(&s).unwrap();
        assert_eq!(ca.get(0), Some(1.5));
        assert_eq!(ca.get(1), None);
        assert_eq!(ca.get(2), Some(3.0));
    }

    #[test]
    fn test_to_text_formats_integers() {
        let s = Series::new("a".into(), &[1i64, 0]);
        let ca = to_text(&s).unwrap();
        assert_eq!(ca.get(0), Some("1"));
        assert_eq!(ca.get(1), Some("0"));
    }

    #[test]
    fn test_present_values_skips_nulls_and_nan() {
        let s = Series::new("a".into(), &[Some(1.0), None, Some(f64::NAN), Some(4.0)]);
        let ca = to_float(&s).unwrap();
        assert_eq!(present_values(&ca), vec![1.0, 4.0]);
    }
}
