//! Point predictions with confidence intervals for the fitted mean.

use super::ols::FittedOls;
use crate::distributions::t_critical;
use crate::error::{EstimationError, Result};
use crate::linalg::dot;

/// Predictions for a batch of new predictor rows.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PredictionResult {
    mean: Vec<f64>,
    std_errors: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
    level: f64,
}

impl PredictionResult {
    /// Point estimates `x·β`.
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Standard error of the fitted mean at each row.
    pub fn std_errors(&self) -> &[f64] {
        &self.std_errors
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }
}

impl FittedOls {
    /// Predict the mean response for new rows of predictor values.
    ///
    /// Rows hold predictor values only; the intercept is added when the
    /// model was fit with one. The interval half-width at row `x` is
    /// `t · σ · sqrt(xᵗ(XᵗX)⁻¹x)` with `n - p` degrees of freedom.
    pub fn predict(&self, rows: &[Vec<f64>], level: f64) -> Result<PredictionResult> {
        if rows.is_empty() {
            return Err(EstimationError::EmptyData);
        }
        let t = t_critical(level, self.df_resid() as f64)?;
        let sigma = self.residual_std_error();

        let mut mean = Vec::with_capacity(rows.len());
        let mut std_errors = Vec::with_capacity(rows.len());
        for row in rows {
            let x = self.design().expand_row(row)?;
            mean.push(dot(&x, self.coefficients()));
            let leverage = self.xtx_inverse().quadratic_form(&x)?.max(0.0);
            std_errors.push(sigma * leverage.sqrt());
        }

        let lower = mean.iter().zip(&std_errors).map(|(m, se)| m - t * se).collect();
        let upper = mean.iter().zip(&std_errors).map(|(m, se)| m + t * se).collect();
        Ok(PredictionResult {
            mean,
            std_errors,
            lower,
            upper,
            level,
        })
    }
}
