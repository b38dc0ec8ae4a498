//! Binning / discretization into derived group columns
//!
//! Buckets are right-closed intervals with the lowest boundary included:
//! edges `[18, 25, 35]` give `[18, 25]` and `(25, 35]`. Values outside the
//! fitted edges are clamped to the first or last bucket, so held-out data
//! always receives a group.

use super::{has_column, present_values, to_float};
use crate::error::Result;
use crate::schema;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Quantile of sorted values with linear interpolation between the two
/// nearest ranks
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Bucket index of a value, clamped to the edge range
pub fn find_bin(value: f64, edges: &[f64]) -> usize {
    let n_bins = edges.len().saturating_sub(1);
    if n_bins == 0 {
        return 0;
    }
    edges[1..]
        .iter()
        .position(|&upper| value <= upper)
        .unwrap_or(n_bins - 1)
}

fn strictly_increasing(edges: &[f64]) -> bool {
    edges.len() >= 2 && edges.windows(2).all(|w| w[0] < w[1])
}

/// Derives Age_Group and Premium_Group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binner {
    age_edges: Vec<f64>,
    /// Quantile edges of the training premiums; may be degenerate
    premium_edges: Option<Vec<f64>>,
}

impl Binner {
    /// Create a binner with known edges
    pub fn new(age_edges: Vec<f64>, premium_edges: Option<Vec<f64>>) -> Self {
        Self {
            age_edges,
            premium_edges,
        }
    }

    /// Compute premium edges at the given quantiles of the training premiums
    pub fn fit(df: &DataFrame, age_edges: Vec<f64>, premium_quantiles: &[f64]) -> Result<Self> {
        let premium_edges = if has_column(df, schema::ANNUAL_PREMIUM) {
            let premiums = to_float(df.column(schema::ANNUAL_PREMIUM)?.as_materialized_series())?;
            let mut values = present_values(&premiums);
            values.sort_by(|a, b| a.total_cmp(b));
            premium_quantiles
                .iter()
                .map(|&q| quantile(&values, q))
                .collect::<Option<Vec<f64>>>()
        } else {
            None
        };

        Ok(Self::new(age_edges, premium_edges))
    }

    pub fn age_edges(&self) -> &[f64] {
        &self.age_edges
    }

    pub fn premium_edges(&self) -> Option<&[f64]> {
        self.premium_edges.as_deref()
    }

    /// Whether Premium_Group can be derived from the fitted edges
    pub fn has_premium_groups(&self) -> bool {
        self.premium_edges
            .as_deref()
            .map(strictly_increasing)
            .unwrap_or(false)
    }

    /// Append the group columns
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut result = df.clone();

        if has_column(df, schema::AGE) {
            if strictly_increasing(&self.age_edges) {
                let groups = self.bin_column(df, schema::AGE, schema::AGE_GROUP, &self.age_edges)?;
                result.with_column(groups)?;
            } else {
                warn!(edges = ?self.age_edges, "Age edges not increasing, omitting Age_Group");
            }
        }

        if has_column(df, schema::ANNUAL_PREMIUM) {
            match self.premium_edges.as_deref() {
                Some(edges) if strictly_increasing(edges) => {
                    let groups =
                        self.bin_column(df, schema::ANNUAL_PREMIUM, schema::PREMIUM_GROUP, edges)?;
                    result.with_column(groups)?;
                }
                edges => {
                    warn!(edges = ?edges, "Premium edges degenerate, omitting Premium_Group");
                }
            }
        }

        Ok(result)
    }

    fn bin_column(&self, df: &DataFrame, source: &str, target: &str, edges: &[f64]) -> Result<Series> {
        let values = to_float(df.column(source)?.as_materialized_series())?;

        let groups: Float64Chunked = values
            .into_iter()
            .map(|v| match v {
                Some(x) if !x.is_nan() => Some(find_bin(x, edges) as f64),
                _ => None,
            })
            .collect();

        Ok(groups.with_name(target.into()).into_series())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGE_EDGES: [f64; 6] = [18.0, 25.0, 35.0, 50.0, 65.0, 100.0];

    #[test]
    fn test_quantile_linear() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile(&sorted, 0.0), Some(1.0));
        assert_eq!(quantile(&sorted, 0.5), Some(3.0));
        assert_eq!(quantile(&sorted, 1.0), Some(5.0));
        assert!((quantile(&sorted, 0.2).unwrap() - 1.8).abs() < 1e-12);
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_find_bin_right_closed() {
        assert_eq!(find_bin(18.0, &AGE_EDGES), 0);
        assert_eq!(find_bin(25.0, &AGE_EDGES), 0);
        assert_eq!(find_bin(25.5, &AGE_EDGES), 1);
        assert_eq!(find_bin(50.0, &AGE_EDGES), 2);
        assert_eq!(find_bin(100.0, &AGE_EDGES), 4);
    }

    #[test]
    fn test_find_bin_clamps() {
        assert_eq!(find_bin(5.0, &AGE_EDGES), 0);
        assert_eq!(find_bin(140.0, &AGE_EDGES), 4);
    }

    #[test]
    fn test_age_groups() {
        let df = df!("Age" => &[18i64, 30, 70, 17]).unwrap();
        let binner = Binner::new(AGE_EDGES.to_vec(), None);
        let result = binner.transform(&df).unwrap();

        let groups = result.column("Age_Group").unwrap().f64().unwrap();
        let got: Vec<Option<f64>> = groups.into_iter().collect();
        assert_eq!(got, vec![Some(0.0), Some(1.0), Some(4.0), Some(0.0)]);
    }

    #[test]
    fn test_premium_quantile_groups() {
        let premiums: Vec<f64> = (0..=100).map(|v| v as f64 * 100.0).collect();
        let df = df!("Annual_Premium" => &premiums).unwrap();

        let binner = Binner::fit(&df, AGE_EDGES.to_vec(), &[0.0, 0.2, 0.4, 0.6, 0.8, 1.0]).unwrap();
        assert_eq!(
            binner.premium_edges().unwrap(),
            &[0.0, 2000.0, 4000.0, 6000.0, 8000.0, 10000.0]
        );

        let result = binner.transform(&df).unwrap();
        let groups = result.column("Premium_Group").unwrap().f64().unwrap();
        assert_eq!(groups.get(0), Some(0.0));
        assert_eq!(groups.get(20), Some(0.0));
        assert_eq!(groups.get(21), Some(1.0));
        assert_eq!(groups.get(100), Some(4.0));
    }

    #[test]
    fn test_degenerate_premium_edges_omit_column() {
        let df = df!("Annual_Premium" => &[2630.0, 2630.0, 2630.0, 2630.0]).unwrap();
        let binner = Binner::fit(&df, AGE_EDGES.to_vec(), &[0.0, 0.2, 0.4, 0.6, 0.8, 1.0]).unwrap();

        assert!(!binner.has_premium_groups());
        let result = binner.transform(&df).unwrap();
        assert!(result.column("Premium_Group").is_err());
        assert_eq!(result.width(), 1);
    }
}
