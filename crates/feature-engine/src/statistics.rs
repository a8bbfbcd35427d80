//! Statistical Features Computation

use crate::error::StatsError;
use serde::{Deserialize, Serialize};

/// Number of statistics in one summary block
pub const STATISTICS_PER_SERIES: usize = 8;

/// Names of the summary statistics, in vector order
pub const STATISTIC_NAMES: [&str; STATISTICS_PER_SERIES] =
    ["mean", "median", "min", "max", "std", "var", "coef_var", "iqr"];

/// Summary statistics for a derived series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticalFeatures {
    /// Mean value
    pub mean: f64,
    /// 50th percentile
    pub median: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Population variance
    pub variance: f64,
    /// std_dev / |mean|
    pub coef_var: f64,
    /// 75th minus 25th percentile
    pub iqr: f64,
}

impl StatisticalFeatures {
    /// Compute every statistic of a non-empty series.
    ///
    /// Fails on an empty series and when the mean is exactly zero, since the
    /// coefficient of variation is then undefined.
    pub fn compute(values: &[f64]) -> Result<Self, StatsError> {
        let mean = mean(values)?;
        let sorted = sorted_copy(values);

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];

        let variance = variance_about(values, mean);
        let std_dev = variance.sqrt();
        let coef_var = coef_var_from(std_dev, mean)?;

        let median = percentile_sorted(&sorted, 50.0);
        let iqr = percentile_sorted(&sorted, 75.0) - percentile_sorted(&sorted, 25.0);

        Ok(Self {
            mean,
            median,
            min,
            max,
            std_dev,
            variance,
            coef_var,
            iqr,
        })
    }

    /// Statistics in the order of [`STATISTIC_NAMES`]
    pub fn to_array(&self) -> [f64; STATISTICS_PER_SERIES] {
        [
            self.mean,
            self.median,
            self.min,
            self.max,
            self.std_dev,
            self.variance,
            self.coef_var,
            self.iqr,
        ]
    }
}

fn require_values(values: &[f64], statistic: &'static str) -> Result<(), StatsError> {
    if values.is_empty() {
        Err(StatsError::EmptySeries { statistic })
    } else {
        Ok(())
    }
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

fn variance_about(values: &[f64], mean: f64) -> f64 {
    let m2: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    m2 / values.len() as f64
}

fn coef_var_from(std_dev: f64, mean: f64) -> Result<f64, StatsError> {
    if mean == 0.0 {
        return Err(StatsError::ZeroMean);
    }
    Ok(std_dev / mean.abs())
}

/// Linear interpolation between the order statistics around rank
/// `p / 100 * (n - 1)`. `sorted` must be non-empty and ascending.
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64, StatsError> {
    require_values(values, "mean")?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Linearly interpolated 50th percentile
pub fn median(values: &[f64]) -> Result<f64, StatsError> {
    require_values(values, "median")?;
    Ok(percentile_sorted(&sorted_copy(values), 50.0))
}

pub fn min(values: &[f64]) -> Result<f64, StatsError> {
    require_values(values, "min")?;
    Ok(values.iter().copied().fold(f64::INFINITY, f64::min))
}

pub fn max(values: &[f64]) -> Result<f64, StatsError> {
    require_values(values, "max")?;
    Ok(values.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

/// Population variance
pub fn variance(values: &[f64]) -> Result<f64, StatsError> {
    let mean = mean(values)?;
    Ok(variance_about(values, mean))
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> Result<f64, StatsError> {
    Ok(variance(values)?.sqrt())
}

/// Coefficient of variation, `std / |mean|`
pub fn coef_var(values: &[f64]) -> Result<f64, StatsError> {
    let mean = mean(values)?;
    coef_var_from(variance_about(values, mean).sqrt(), mean)
}

/// Percentile `p` in `[0, 100]`, linearly interpolated
pub fn percentile(values: &[f64], p: f64) -> Result<f64, StatsError> {
    if !(0.0..=100.0).contains(&p) {
        return Err(StatsError::PercentileOutOfRange(p));
    }
    require_values(values, "percentile")?;
    Ok(percentile_sorted(&sorted_copy(values), p))
}

/// Interquartile range
pub fn iqr(values: &[f64]) -> Result<f64, StatsError> {
    Ok(percentile(values, 75.0)? - percentile(values, 25.0)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mean_computation() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = StatisticalFeatures::compute(&values).unwrap();
        assert!((stats.mean - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_std_dev_computation() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = StatisticalFeatures::compute(&values).unwrap();
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
        assert!((stats.variance - 4.0).abs() < 1e-12);
        assert!((stats.coef_var - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_percentile_interpolates() {
        let values = vec![10.0, 1.0, 4.0, 7.0];
        // sorted [1, 4, 7, 10], rank 0.75 * 3 = 2.25
        assert!((percentile(&values, 75.0).unwrap() - 7.75).abs() < 1e-12);
        assert_eq!(percentile(&values, 0.0).unwrap(), 1.0);
        assert_eq!(percentile(&values, 100.0).unwrap(), 10.0);
        assert!((median(&values).unwrap() - 5.5).abs() < 1e-12);
    }

    #[test]
    fn test_iqr_is_half_range_for_uniform_five() {
        let values = vec![2.0, 4.0, 6.0, 8.0, 10.0];
        assert_eq!(iqr(&values).unwrap(), 4.0);
        let stats = StatisticalFeatures::compute(&values).unwrap();
        assert_eq!(stats.iqr, (stats.max - stats.min) / 2.0);
    }

    #[test]
    fn test_percentile_out_of_range() {
        let values = vec![1.0, 2.0];
        assert_eq!(
            percentile(&values, 101.0),
            Err(StatsError::PercentileOutOfRange(101.0))
        );
        assert!(percentile(&values, -0.5).is_err());
        assert!(percentile(&values, f64::NAN).is_err());
    }

    #[test]
    fn test_coef_var_zero_mean_fails() {
        let values = vec![-1.0, 1.0];
        assert_eq!(coef_var(&values), Err(StatsError::ZeroMean));
        assert_eq!(StatisticalFeatures::compute(&values), Err(StatsError::ZeroMean));
    }

    #[test]
    fn test_coef_var_uses_absolute_mean() {
        let values = vec![-2.0, -4.0];
        assert!((coef_var(&values).unwrap() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_values() {
        let values: Vec<f64> = vec![];
        assert_eq!(
            StatisticalFeatures::compute(&values),
            Err(StatsError::EmptySeries { statistic: "mean" })
        );
        assert!(median(&values).is_err());
        assert!(min(&values).is_err());
        assert!(iqr(&values).is_err());
    }

    #[test]
    fn test_single_value() {
        let stats = StatisticalFeatures::compute(&[3.0]).unwrap();
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.iqr, 0.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.coef_var, 0.0);
    }

    #[test]
    fn test_compute_matches_free_functions() {
        let values = vec![0.3, 1.7, -0.4, 2.2, 0.9, 1.1];
        let stats = StatisticalFeatures::compute(&values).unwrap();
        assert_eq!(stats.mean, mean(&values).unwrap());
        assert_eq!(stats.median, median(&values).unwrap());
        assert_eq!(stats.min, min(&values).unwrap());
        assert_eq!(stats.max, max(&values).unwrap());
        assert_eq!(stats.variance, variance(&values).unwrap());
        assert_eq!(stats.std_dev, std_dev(&values).unwrap());
        assert_eq!(stats.coef_var, coef_var(&values).unwrap());
        assert_eq!(stats.iqr, iqr(&values).unwrap());
    }

    proptest! {
        #[test]
        fn prop_iqr_is_percentile_difference(values in prop::collection::vec(-1e6f64..1e6, 1..64)) {
            let expected = percentile(&values, 75.0).unwrap() - percentile(&values, 25.0).unwrap();
            prop_assert_eq!(iqr(&values).unwrap(), expected);
            prop_assert!(expected >= 0.0);
        }

        #[test]
        fn prop_median_within_extrema(values in prop::collection::vec(-1e6f64..1e6, 1..64)) {
            let m = median(&values).unwrap();
            prop_assert!(m >= min(&values).unwrap() && m <= max(&values).unwrap());
        }
    }
}
