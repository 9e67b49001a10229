//! Ordinary least squares with full inferential statistics.

use tracing::{debug, instrument, warn};

use super::design::DesignMatrix;
use crate::distributions::{f_survival, t_critical, t_two_sided_p_value};
use crate::error::{ensure_finite, ensure_level, EstimationError, Result};
use crate::linalg::{Matrix, QrDecomposition, DEFAULT_SINGULARITY_TOLERANCE};
use crate::utils::stats::mean;

/// Residual sum of squares at or below this fraction of `Σy²` is an exact fit.
const EXACT_FIT_TOLERANCE: f64 = 1e-24;

/// Configuration for OLS estimation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OlsConfig {
    /// Prepend a constant column when building the design from raw columns.
    pub include_intercept: bool,
    /// Level used for the coefficient table intervals.
    pub confidence_level: f64,
    /// Relative pivot tolerance for rank-deficiency detection.
    pub singularity_tolerance: f64,
}

impl Default for OlsConfig {
    fn default() -> Self {
        Self {
            include_intercept: true,
            confidence_level: 0.95,
            singularity_tolerance: DEFAULT_SINGULARITY_TOLERANCE,
        }
    }
}

impl OlsConfig {
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.include_intercept = include;
        self
    }

    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    pub fn with_singularity_tolerance(mut self, tolerance: f64) -> Self {
        self.singularity_tolerance = tolerance;
        self
    }

    fn validate(&self) -> Result<()> {
        ensure_level(self.confidence_level)?;
        if !(self.singularity_tolerance.is_finite() && self.singularity_tolerance > 0.0) {
            return Err(EstimationError::InvalidParameter(format!(
                "singularity tolerance must be positive, got {}",
                self.singularity_tolerance
            )));
        }
        Ok(())
    }
}

/// Least-squares estimator.
#[derive(Debug, Clone, Default)]
pub struct OlsEstimator {
    config: OlsConfig,
}

impl OlsEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: OlsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OlsConfig {
        &self.config
    }

    /// Fit `y` on unnamed predictor columns (named `x1`, `x2`, ...).
    pub fn fit_predictors(&self, y: &[f64], columns: &[Vec<f64>]) -> Result<FittedOls> {
        let design = DesignMatrix::from_predictors(columns, self.config.include_intercept)?;
        self.fit(design, y)
    }

    /// Fit `y` on named predictor columns.
    pub fn fit_named<S: AsRef<str>>(
        &self,
        y: &[f64],
        names: &[S],
        columns: &[Vec<f64>],
    ) -> Result<FittedOls> {
        let design = DesignMatrix::from_columns(names, columns, self.config.include_intercept)?;
        self.fit(design, y)
    }

    /// Fit `y` on a prepared design matrix.
    ///
    /// Requires `n ≥ columns + 1` so the residual degrees of freedom are
    /// positive, and a full-rank design.
    #[instrument(skip(self, design, y), fields(n = design.n_obs(), k = design.n_predictors()))]
    pub fn fit(&self, design: DesignMatrix, y: &[f64]) -> Result<FittedOls> {
        self.config.validate()?;
        let n = design.n_obs();
        let p = design.n_columns();
        if y.len() != n {
            return Err(EstimationError::DimensionMismatch {
                expected: n,
                got: y.len(),
            });
        }
        ensure_finite(y)?;
        if n < p + 1 {
            return Err(EstimationError::InsufficientData {
                needed: p + 1,
                got: n,
            });
        }

        let qr = QrDecomposition::with_tolerance(design.matrix(), self.config.singularity_tolerance)?;
        let coefficients = qr.solve(y)?;
        let fitted = design.matrix().mul_vec(&coefficients)?;
        let residuals: Vec<f64> = y.iter().zip(&fitted).map(|(a, f)| a - f).collect();

        let sum_y_sq: f64 = y.iter().map(|v| v * v).sum();
        let sst = if design.has_intercept() {
            let y_mean = mean(y);
            y.iter().map(|v| (v - y_mean).powi(2)).sum()
        } else {
            sum_y_sq
        };
        if sst == 0.0 {
            return Err(EstimationError::InvalidParameter(
                "response has zero variation".into(),
            ));
        }

        let mut ssr: f64 = residuals.iter().map(|e| e * e).sum();
        let exact_fit = ssr <= EXACT_FIT_TOLERANCE * sum_y_sq;
        if exact_fit {
            warn!("exact fit: residual variance is zero, inference is degenerate");
            ssr = 0.0;
        }

        let df_resid = n - p;
        let df_model = p - usize::from(design.has_intercept());
        let sigma2 = ssr / df_resid as f64;

        let xtx_inverse = qr.unscaled_covariance();
        let covariance = xtx_inverse.scaled(sigma2);
        let std_errors: Vec<f64> = covariance.diagonal().iter().map(|v| v.sqrt()).collect();
        let t_values: Vec<f64> = coefficients
            .iter()
            .zip(&std_errors)
            .map(|(&b, &se)| {
                if se > 0.0 {
                    b / se
                } else {
                    f64::INFINITY.copysign(b)
                }
            })
            .collect();
        let p_values = t_values
            .iter()
            .map(|&t| t_two_sided_p_value(t, df_resid as f64))
            .collect::<Result<Vec<_>>>()?;

        let r_squared = 1.0 - ssr / sst;
        let adjusted_r_squared = 1.0
            - (1.0 - r_squared) * (n - usize::from(design.has_intercept())) as f64
                / df_resid as f64;

        let f_statistic = if ssr > 0.0 {
            ((sst - ssr) / df_model as f64) / sigma2
        } else {
            f64::INFINITY
        };
        let f_p_value = f_survival(f_statistic, df_model as f64, df_resid as f64)?;

        let nf = n as f64;
        let log_likelihood = -nf / 2.0 * ((2.0 * std::f64::consts::PI * ssr / nf).ln() + 1.0);

        debug!(
            r_squared,
            sigma = sigma2.sqrt(),
            f_statistic,
            "ols fit complete"
        );

        Ok(FittedOls {
            design,
            coefficients,
            std_errors,
            t_values,
            p_values,
            residuals,
            fitted,
            covariance,
            xtx_inverse,
            sigma: sigma2.sqrt(),
            ssr,
            sst,
            r_squared,
            adjusted_r_squared,
            f_statistic,
            f_p_value,
            log_likelihood,
            df_resid,
            df_model,
            confidence_level: self.config.confidence_level,
        })
    }
}

/// One row of the coefficient table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoefficientRow {
    pub name: String,
    pub coefficient: f64,
    pub std_error: f64,
    pub t_value: f64,
    pub p_value: f64,
    /// Lower bound of the interval at the fit's confidence level.
    pub lower: f64,
    pub upper: f64,
}

/// Result of a successful OLS fit. Immutable.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FittedOls {
    design: DesignMatrix,
    coefficients: Vec<f64>,
    std_errors: Vec<f64>,
    t_values: Vec<f64>,
    p_values: Vec<f64>,
    residuals: Vec<f64>,
    fitted: Vec<f64>,
    covariance: Matrix,
    xtx_inverse: Matrix,
    sigma: f64,
    ssr: f64,
    sst: f64,
    r_squared: f64,
    adjusted_r_squared: f64,
    f_statistic: f64,
    f_p_value: f64,
    log_likelihood: f64,
    df_resid: usize,
    df_model: usize,
    confidence_level: f64,
}

impl FittedOls {
    pub fn design(&self) -> &DesignMatrix {
        &self.design
    }

    /// Coefficient names, `const` first when fit with an intercept.
    pub fn names(&self) -> &[String] {
        self.design.names()
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Coefficient by column name.
    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.names()
            .iter()
            .position(|n| n == name)
            .map(|i| self.coefficients[i])
    }

    pub fn std_errors(&self) -> &[f64] {
        &self.std_errors
    }

    pub fn t_values(&self) -> &[f64] {
        &self.t_values
    }

    pub fn p_values(&self) -> &[f64] {
        &self.p_values
    }

    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    pub fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    /// Coefficient covariance `σ²(XᵗX)⁻¹`.
    pub fn covariance(&self) -> &Matrix {
        &self.covariance
    }

    pub(crate) fn xtx_inverse(&self) -> &Matrix {
        &self.xtx_inverse
    }

    /// Residual standard error σ.
    pub fn residual_std_error(&self) -> f64 {
        self.sigma
    }

    /// Residual sum of squares.
    pub fn ssr(&self) -> f64 {
        self.ssr
    }

    /// Total sum of squares (uncentered when fit without an intercept).
    pub fn sst(&self) -> f64 {
        self.sst
    }

    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    pub fn adjusted_r_squared(&self) -> f64 {
        self.adjusted_r_squared
    }

    pub fn f_statistic(&self) -> f64 {
        self.f_statistic
    }

    pub fn f_p_value(&self) -> f64 {
        self.f_p_value
    }

    /// Gaussian log-likelihood at the estimate.
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood + 2.0 * self.n_params() as f64
    }

    pub fn bic(&self) -> f64 {
        -2.0 * self.log_likelihood + self.n_params() as f64 * (self.n_obs() as f64).ln()
    }

    pub fn n_obs(&self) -> usize {
        self.design.n_obs()
    }

    /// Number of estimated coefficients, including the intercept.
    pub fn n_params(&self) -> usize {
        self.coefficients.len()
    }

    pub fn df_resid(&self) -> usize {
        self.df_resid
    }

    pub fn df_model(&self) -> usize {
        self.df_model
    }

    /// Confidence level the fit was configured with.
    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Per-coefficient intervals `β ± t·SE` at `level`.
    pub fn confidence_intervals(&self, level: f64) -> Result<Vec<(f64, f64)>> {
        let t = t_critical(level, self.df_resid as f64)?;
        Ok(self
            .coefficients
            .iter()
            .zip(&self.std_errors)
            .map(|(b, se)| (b - t * se, b + t * se))
            .collect())
    }

    /// Coefficient table with intervals at the configured level.
    pub fn coefficient_table(&self) -> Result<Vec<CoefficientRow>> {
        let intervals = self.confidence_intervals(self.confidence_level)?;
        Ok(self
            .names()
            .iter()
            .enumerate()
            .map(|(i, name)| CoefficientRow {
                name: name.clone(),
                coefficient: self.coefficients[i],
                std_error: self.std_errors[i],
                t_value: self.t_values[i],
                p_value: self.p_values[i],
                lower: intervals[i].0,
                upper: intervals[i].1,
            })
            .collect())
    }
}
