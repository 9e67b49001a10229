//! ARIMA(p, d, q) specification and conditional-likelihood estimation.

use tracing::{debug, instrument, warn};

use super::diff::difference;
use super::params::ParameterMap;
use super::yule_walker::{autocovariances, is_invertible, is_stationary, levinson_durbin};
use crate::core::TimeSeries;
use crate::error::{EstimationError, Result};
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::mean;

/// Optimizer settings for ARIMA estimation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArimaConfig {
    /// Iteration budget of the likelihood search.
    pub max_iterations: usize,
    /// Relative spread of objective values across the simplex at which the
    /// search stops.
    pub convergence_tolerance: f64,
    /// Initial simplex step.
    pub initial_step: f64,
    /// Estimate a mean for the differenced series. `None` estimates one only
    /// when `d = 0`.
    pub include_mean: Option<bool>,
    /// Search AR terms through partial autocorrelations so the estimate is
    /// always stationary.
    pub enforce_stationarity: bool,
    /// Search MA terms through partial autocorrelations so the estimate is
    /// always invertible.
    pub enforce_invertibility: bool,
}

impl Default for ArimaConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5000,
            convergence_tolerance: 1e-10,
            initial_step: 0.1,
            include_mean: None,
            enforce_stationarity: true,
            enforce_invertibility: true,
        }
    }
}

impl ArimaConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_convergence_tolerance(mut self, tolerance: f64) -> Self {
        self.convergence_tolerance = tolerance;
        self
    }

    pub fn with_mean(mut self, include: bool) -> Self {
        self.include_mean = Some(include);
        self
    }

    pub fn with_enforce_stationarity(mut self, enforce: bool) -> Self {
        self.enforce_stationarity = enforce;
        self
    }

    pub fn with_enforce_invertibility(mut self, enforce: bool) -> Self {
        self.enforce_invertibility = enforce;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(EstimationError::InvalidParameter(
                "max_iterations must be positive".into(),
            ));
        }
        if !(self.convergence_tolerance > 0.0 && self.convergence_tolerance.is_finite()) {
            return Err(EstimationError::InvalidParameter(format!(
                "convergence tolerance must be positive, got {}",
                self.convergence_tolerance
            )));
        }
        if !(self.initial_step > 0.0 && self.initial_step.is_finite()) {
            return Err(EstimationError::InvalidParameter(format!(
                "initial step must be positive, got {}",
                self.initial_step
            )));
        }
        Ok(())
    }
}

/// Unfitted ARIMA(p, d, q) model.
///
/// ```
/// use anofox_estimate::core::TimeSeries;
/// use anofox_estimate::models::arima::ArimaSpec;
///
/// let values: Vec<f64> = (0..60).map(|i| 10.0 + (i as f64 * 0.7).sin()).collect();
/// let series = TimeSeries::new(values).unwrap();
/// let model = ArimaSpec::new(1, 0, 0).fit(&series).unwrap();
/// assert_eq!(model.ar_coefficients().len(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArimaSpec {
    p: usize,
    d: usize,
    q: usize,
}

impl ArimaSpec {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    pub fn p(&self) -> usize {
        self.p
    }

    pub fn d(&self) -> usize {
        self.d
    }

    pub fn q(&self) -> usize {
        self.q
    }

    /// Parameters counted by the information criteria: AR + MA + variance.
    pub fn num_params(&self) -> usize {
        self.p + self.q + 1
    }

    /// Fit with the default configuration.
    pub fn fit(&self, series: &TimeSeries) -> Result<ArimaModel> {
        self.fit_with_config(series, &ArimaConfig::default())
    }

    /// Fit raw observations with the default configuration.
    pub fn fit_values(&self, values: &[f64]) -> Result<ArimaModel> {
        self.fit(&TimeSeries::new(values.to_vec())?)
    }

    /// Estimate AR and MA coefficients by maximizing the conditional
    /// Gaussian likelihood of the differenced series.
    ///
    /// The search starts from Yule-Walker AR estimates with MA terms at
    /// zero. Requires `n − d ≥ p + q + 1`. Unless enforcement is switched off
    /// in `config`, the search stays inside the stationary and invertible
    /// region; otherwise an estimate outside it fails with `NonStationary`.
    #[instrument(skip(self, series, config), fields(n = series.len(), p = self.p, d = self.d, q = self.q))]
    pub fn fit_with_config(&self, series: &TimeSeries, config: &ArimaConfig) -> Result<ArimaModel> {
        config.validate()?;
        let y = series.values();
        let needed = self.d + self.p + self.q + 1;
        if y.len() < needed {
            return Err(EstimationError::InsufficientData {
                needed,
                got: y.len(),
            });
        }

        let differenced = difference(y, self.d);
        let mu = config
            .include_mean
            .unwrap_or(self.d == 0)
            .then(|| mean(&differenced));
        let working: Vec<f64> = differenced
            .iter()
            .map(|v| v - mu.unwrap_or(0.0))
            .collect();
        if working.iter().all(|v| *v == 0.0) {
            return Err(EstimationError::InvalidParameter(
                "series has no variation left after differencing and mean removal".into(),
            ));
        }
        let n_terms = working.len() - self.p;
        let map = ParameterMap {
            p: self.p,
            q: self.q,
            enforce_stationarity: config.enforce_stationarity,
            enforce_invertibility: config.enforce_invertibility,
        };

        let ((ar, ma), iterations) = if self.p + self.q == 0 {
            ((Vec::new(), Vec::new()), 0)
        } else {
            let (seed, partials) = levinson_durbin(&autocovariances(&working, self.p), self.p);
            let initial = map.initial(&seed, &partials);
            let bounds = map.bounds();

            let objective = |params: &[f64]| {
                let (ar, ma) = map.coefficients(params);
                let e = conditional_residuals(&working, &ar, &ma);
                e[self.p..].iter().map(|v| v * v).sum::<f64>() / n_terms as f64
            };
            let nm_config = NelderMeadConfig {
                max_iterations: config.max_iterations,
                tolerance: config.convergence_tolerance,
                initial_step: config.initial_step,
                ..Default::default()
            };
            let result = nelder_mead(objective, &initial, Some(&bounds), nm_config);
            if !result.converged {
                warn!(iterations = result.iterations, "likelihood search did not converge");
                return Err(EstimationError::NonConvergence {
                    iterations: result.iterations,
                });
            }
            if result.iterations * 10 > config.max_iterations * 9 {
                warn!(
                    iterations = result.iterations,
                    budget = config.max_iterations,
                    "likelihood search used most of its iteration budget"
                );
            }
            (map.coefficients(&result.optimal_point), result.iterations)
        };

        if !is_stationary(&ar) {
            return Err(EstimationError::NonStationary { component: "AR" });
        }
        if !is_invertible(&ma) {
            return Err(EstimationError::NonStationary { component: "MA" });
        }

        let innovations = conditional_residuals(&working, &ar, &ma);
        let css: f64 = innovations[self.p..].iter().map(|v| v * v).sum();
        let sigma2 = css / n_terms as f64;
        let nt = n_terms as f64;
        let log_likelihood = -nt / 2.0 * ((2.0 * std::f64::consts::PI * sigma2).ln() + 1.0);
        let k = self.num_params() as f64;
        let aic = -2.0 * log_likelihood + 2.0 * k;
        let bic = -2.0 * log_likelihood + k * nt.ln();

        let skip = self.d + self.p;
        let fitted = y
            .iter()
            .enumerate()
            .map(|(t, v)| (t >= skip).then(|| v - innovations[t - self.d]))
            .collect();

        debug!(ar = ?ar, ma = ?ma, sigma2, aic, iterations, "arima fit complete");

        Ok(ArimaModel {
            spec: *self,
            ar,
            ma,
            mean: mu,
            sigma2,
            log_likelihood,
            aic,
            bic,
            working,
            innovations,
            fitted,
            iterations,
            series: series.clone(),
        })
    }
}

/// One-step prediction errors of the ARMA recursion
/// `εₜ = zₜ − Σφᵢzₜ₋ᵢ − Σθⱼεₜ₋ⱼ`, conditioned on zero errors before `t = p`.
pub(crate) fn conditional_residuals(z: &[f64], ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let p = ar.len();
    let mut e = vec![0.0; z.len()];
    for t in p..z.len() {
        let mut prediction: f64 = ar.iter().enumerate().map(|(i, phi)| phi * z[t - 1 - i]).sum();
        for (j, theta) in ma.iter().enumerate() {
            if let Some(lag) = t.checked_sub(j + 1) {
                prediction += theta * e[lag];
            }
        }
        e[t] = z[t] - prediction;
    }
    e
}

/// Fitted ARIMA model. Immutable.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArimaModel {
    spec: ArimaSpec,
    ar: Vec<f64>,
    ma: Vec<f64>,
    mean: Option<f64>,
    sigma2: f64,
    log_likelihood: f64,
    aic: f64,
    bic: f64,
    /// Differenced series with the mean removed.
    working: Vec<f64>,
    /// Innovations aligned with `working`; zero for the first `p` positions.
    innovations: Vec<f64>,
    fitted: Vec<Option<f64>>,
    iterations: usize,
    series: TimeSeries,
}

impl ArimaModel {
    pub fn spec(&self) -> ArimaSpec {
        self.spec
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma
    }

    /// Mean of the differenced series, when one was estimated.
    pub fn mean(&self) -> Option<f64> {
        self.mean
    }

    /// Innovation variance σ².
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    pub fn aic(&self) -> f64 {
        self.aic
    }

    pub fn bic(&self) -> f64 {
        self.bic
    }

    /// Residuals entering the likelihood; entry `i` belongs to observation
    /// `d + p + i`.
    pub fn residuals(&self) -> &[f64] {
        &self.innovations[self.spec.p..]
    }

    /// One-step-ahead fitted values on the original scale; absent for the
    /// first `d + p` observations.
    pub fn fitted_values(&self) -> &[Option<f64>] {
        &self.fitted
    }

    /// Optimizer iterations used (0 for ARIMA(0, d, 0)).
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Length of the series the model was fit on.
    pub fn n_obs(&self) -> usize {
        self.series.len()
    }

    /// Number of terms in the conditional likelihood.
    pub fn n_terms(&self) -> usize {
        self.working.len() - self.spec.p
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub(crate) fn working(&self) -> &[f64] {
        &self.working
    }

    pub(crate) fn innovations(&self) -> &[f64] {
        &self.innovations
    }
}
