//! Classical seasonal decomposition by moving averages.
//!
//! The series is split into:
//! - Trend: centered moving average over one period
//! - Seasonal: per-position averages of the detrended series, centered to sum to zero
//! - Residual: what remains after removing trend and seasonal

use std::ops::Range;

use tracing::{debug, instrument};

use crate::core::TimeSeries;
use crate::error::{ensure_finite, EstimationError, Result};
use crate::utils::stats::{mean, variance};

/// How the components combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecompositionModel {
    /// `series = trend + seasonal + residual`
    #[default]
    Additive,
    /// `series = trend * seasonal * residual`; not supported.
    Multiplicative,
}

/// Result of a classical decomposition.
///
/// Trend and residual are absent for the first and last `period / 2`
/// positions, where the moving-average window does not fit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecompositionResult {
    observed: Vec<f64>,
    trend: Vec<Option<f64>>,
    seasonal: Vec<f64>,
    residual: Vec<Option<f64>>,
    factors: Vec<f64>,
    period: usize,
}

impl DecompositionResult {
    pub fn observed(&self) -> &[f64] {
        &self.observed
    }

    pub fn trend(&self) -> &[Option<f64>] {
        &self.trend
    }

    pub fn seasonal(&self) -> &[f64] {
        &self.seasonal
    }

    pub fn residual(&self) -> &[Option<f64>] {
        &self.residual
    }

    /// One period of seasonal factors; they sum to zero.
    pub fn seasonal_factors(&self) -> &[f64] {
        &self.factors
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Positions where trend and residual are defined.
    pub fn defined_range(&self) -> Range<usize> {
        let half = self.period / 2;
        half..self.observed.len() - half
    }

    /// `trend + seasonal + residual` at every defined position.
    pub fn reconstruct(&self) -> Vec<Option<f64>> {
        self.trend
            .iter()
            .zip(&self.seasonal)
            .zip(&self.residual)
            .map(|((t, s), r)| Some((*t)? + s + (*r)?))
            .collect()
    }

    /// Strength of seasonality in [0, 1]: `1 - Var(R) / Var(S + R)`.
    pub fn seasonal_strength(&self) -> f64 {
        let range = self.defined_range();
        let residual = self.defined_residual();
        let combined: Vec<f64> = self.seasonal[range]
            .iter()
            .zip(&residual)
            .map(|(s, r)| s + r)
            .collect();
        strength(&residual, &combined)
    }

    /// Strength of trend in [0, 1]: `1 - Var(R) / Var(T + R)`.
    pub fn trend_strength(&self) -> f64 {
        let residual = self.defined_residual();
        let combined: Vec<f64> = self
            .trend
            .iter()
            .flatten()
            .zip(&residual)
            .map(|(t, r)| t + r)
            .collect();
        strength(&residual, &combined)
    }

    fn defined_residual(&self) -> Vec<f64> {
        self.residual.iter().flatten().copied().collect()
    }
}

fn strength(residual: &[f64], combined: &[f64]) -> f64 {
    let var_combined = variance(combined);
    if !(var_combined > 1e-10) {
        return 0.0;
    }
    (1.0 - variance(residual) / var_combined).max(0.0)
}

/// Classical moving-average decomposition.
#[derive(Debug, Clone)]
pub struct SeasonalDecomposer {
    period: usize,
    model: DecompositionModel,
}

impl SeasonalDecomposer {
    /// Decomposer for a seasonal period of at least 2.
    pub fn new(period: usize) -> Self {
        Self {
            period,
            model: DecompositionModel::Additive,
        }
    }

    /// Decomposer using the series' declared period.
    pub fn for_series(series: &TimeSeries) -> Self {
        Self::new(series.period())
    }

    pub fn with_model(mut self, model: DecompositionModel) -> Self {
        self.model = model;
        self
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Decompose a time series.
    pub fn decompose_series(&self, series: &TimeSeries) -> Result<DecompositionResult> {
        self.decompose(series.values())
    }

    /// Decompose raw observations; requires at least two full periods.
    #[instrument(skip(self, values), fields(n = values.len(), period = self.period))]
    pub fn decompose(&self, values: &[f64]) -> Result<DecompositionResult> {
        if self.model == DecompositionModel::Multiplicative {
            return Err(EstimationError::InvalidParameter(
                "multiplicative decomposition is not supported".into(),
            ));
        }
        if self.period < 2 {
            return Err(EstimationError::InvalidParameter(format!(
                "seasonal period must be at least 2, got {}",
                self.period
            )));
        }
        let n = values.len();
        if n < 2 * self.period {
            return Err(EstimationError::InsufficientData {
                needed: 2 * self.period,
                got: n,
            });
        }
        ensure_finite(values)?;

        let trend = centered_moving_average(values, self.period);

        let mut sums = vec![0.0; self.period];
        let mut counts = vec![0usize; self.period];
        for (i, (y, t)) in values.iter().zip(&trend).enumerate() {
            if let Some(t) = t {
                sums[i % self.period] += y - t;
                counts[i % self.period] += 1;
            }
        }
        let averages: Vec<f64> = sums
            .iter()
            .zip(&counts)
            .map(|(s, &c)| s / c as f64)
            .collect();
        let offset = mean(&averages);
        let factors: Vec<f64> = averages.iter().map(|a| a - offset).collect();

        let seasonal: Vec<f64> = (0..n).map(|i| factors[i % self.period]).collect();
        let residual = values
            .iter()
            .zip(&trend)
            .zip(&seasonal)
            .map(|((y, t), s)| t.map(|t| y - t - s))
            .collect();

        debug!(factors = ?factors, "decomposition complete");

        Ok(DecompositionResult {
            observed: values.to_vec(),
            trend,
            seasonal,
            residual,
            factors,
            period: self.period,
        })
    }
}

/// Centered moving average over `period` observations.
///
/// Even periods use the 2×period filter with half weights at both ends so
/// the window stays centered.
fn centered_moving_average(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let half = period / 2;
    let weights: Vec<f64> = if period % 2 == 0 {
        let mut w = vec![1.0; period + 1];
        w[0] = 0.5;
        w[period] = 0.5;
        w
    } else {
        vec![1.0; period]
    };

    (0..n)
        .map(|i| {
            if i < half || i + half >= n {
                return None;
            }
            let window = &values[i - half..=i + half];
            let sum: f64 = window.iter().zip(&weights).map(|(v, w)| v * w).sum();
            Some(sum / period as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn odd_period_moving_average() {
        let trend = centered_moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3);
        assert_eq!(trend[0], None);
        assert_relative_eq!(trend[1].unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(trend[4].unwrap(), 5.0, epsilon = 1e-12);
        assert_eq!(trend[5], None);
    }

    #[test]
    fn even_period_uses_half_weights() {
        let values = [1.0, 5.0, 2.0, 8.0, 3.0, 4.0];
        let trend = centered_moving_average(&values, 4);
        assert_eq!(trend[1], None);
        // (0.5*1 + 5 + 2 + 8 + 0.5*3) / 4
        assert_relative_eq!(trend[2].unwrap(), 16.5 / 4.0, epsilon = 1e-12);
        assert_relative_eq!(trend[3].unwrap(), (2.5 + 2.0 + 8.0 + 3.0 + 2.0) / 4.0, epsilon = 1e-12);
        assert_eq!(trend[4], None);
    }

    #[test]
    fn pure_seasonal_pattern_is_recovered() {
        let pattern = [3.0, -1.0, -2.0, 0.0];
        let values: Vec<f64> = (0..24).map(|i| 10.0 + pattern[i % 4]).collect();
        let result = SeasonalDecomposer::new(4).decompose(&values).unwrap();

        for (f, p) in result.seasonal_factors().iter().zip(&pattern) {
            assert_relative_eq!(*f, *p, epsilon = 1e-10);
        }
        for t in result.trend().iter().flatten() {
            assert_relative_eq!(*t, 10.0, epsilon = 1e-10);
        }
        for r in result.residual().iter().flatten() {
            assert_relative_eq!(*r, 0.0, epsilon = 1e-10);
        }
        assert_eq!(result.defined_range(), 2..22);
        assert!(result.seasonal_strength() > 0.99);
    }

    #[test]
    fn factors_sum_to_zero() {
        let values: Vec<f64> = (0..30)
            .map(|i| 0.5 * i as f64 + [1.0, 4.0, -2.0, 0.5, 3.0][i % 5] + (i as f64).sin())
            .collect();
        let result = SeasonalDecomposer::new(5).decompose(&values).unwrap();
        let sum: f64 = result.seasonal_factors().iter().sum();
        assert_relative_eq!(sum, 0.0, epsilon = 1e-12);
        assert!(result.trend_strength() > 0.9);
    }

    #[test]
    fn rejects_short_series_and_bad_config() {
        let short = vec![1.0; 23];
        assert!(matches!(
            SeasonalDecomposer::new(12).decompose(&short),
            Err(EstimationError::InsufficientData { needed: 24, got: 23 })
        ));
        assert!(matches!(
            SeasonalDecomposer::new(1).decompose(&[1.0; 10]),
            Err(EstimationError::InvalidParameter(_))
        ));
        assert!(matches!(
            SeasonalDecomposer::new(2)
                .with_model(DecompositionModel::Multiplicative)
                .decompose(&[1.0; 10]),
            Err(EstimationError::InvalidParameter(_))
        ));
        let mut with_nan = vec![1.0; 10];
        with_nan[3] = f64::NAN;
        assert!(matches!(
            SeasonalDecomposer::new(2).decompose(&with_nan),
            Err(EstimationError::MissingValues)
        ));
    }

    #[test]
    fn uses_series_period() {
        let ts = TimeSeries::seasonal((0..16).map(|i| (i % 4) as f64).collect(), 4).unwrap();
        let d = SeasonalDecomposer::for_series(&ts);
        assert_eq!(d.period(), 4);
        assert_eq!(d.decompose_series(&ts).unwrap().period(), 4);
    }
}
