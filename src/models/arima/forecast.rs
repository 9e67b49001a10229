//! Multi-step ARIMA forecasting and hold-out evaluation.

use tracing::{debug, instrument};

use super::diff::integrate;
use super::model::{ArimaModel, ArimaSpec};
use crate::core::{ForecastResult, TimeSeries};
use crate::distributions::normal_critical;
use crate::error::{EstimationError, Result};
use crate::utils::metrics::{calculate_metrics, AccuracyMetrics};

/// Confidence level used for hold-out forecasts.
const HOLDOUT_LEVEL: f64 = 0.95;

impl ArimaModel {
    /// Forecast `steps` periods past the end of the series.
    ///
    /// The ARMA recursion runs forward on the differenced scale with future
    /// shocks at zero, then the forecasts are integrated back through the
    /// `d` differences. The variance at horizon `h` is `σ² Σ_{j<h} ψⱼ²` and
    /// the bounds use the Normal quantile at `level`.
    #[instrument(skip(self), fields(p = self.spec().p(), d = self.spec().d(), q = self.spec().q()))]
    pub fn forecast(&self, steps: usize, level: f64) -> Result<ForecastResult> {
        if steps == 0 {
            return Err(EstimationError::InvalidHorizon { steps });
        }
        let critical = normal_critical(level)?;

        let ar = self.ar_coefficients();
        let ma = self.ma_coefficients();
        let mut z = self.working().to_vec();
        let mut e = self.innovations().to_vec();
        for _ in 0..steps {
            let t = z.len();
            let mut next: f64 = ar.iter().enumerate().map(|(i, phi)| phi * z[t - 1 - i]).sum();
            for (j, theta) in ma.iter().enumerate() {
                if let Some(lag) = t.checked_sub(j + 1) {
                    next += theta * e[lag];
                }
            }
            z.push(next);
            e.push(0.0);
        }

        let offset = self.mean().unwrap_or(0.0);
        let differenced: Vec<f64> = z[z.len() - steps..].iter().map(|v| v + offset).collect();
        let point = integrate(&differenced, self.series().values(), self.spec().d())?;

        let mut cumulative = 0.0;
        let std_errors: Vec<f64> = self
            .psi_weights(steps)
            .iter()
            .map(|psi| {
                cumulative += psi * psi;
                (self.sigma2() * cumulative).sqrt()
            })
            .collect();

        debug!(steps, level, "arima forecast complete");

        ForecastResult::from_std_errors(point, std_errors, critical, level)?
            .with_dates(self.series().future_dates(steps)?)
    }

    /// First `count` impulse-response weights ψ of the integrated model,
    /// with ψ₀ = 1.
    pub fn psi_weights(&self, count: usize) -> Vec<f64> {
        let ar = integrated_ar(self.ar_coefficients(), self.spec().d());
        let ma = self.ma_coefficients();
        let mut psi = Vec::with_capacity(count);
        for j in 0..count {
            if j == 0 {
                psi.push(1.0);
                continue;
            }
            let mut w = ma.get(j - 1).copied().unwrap_or(0.0);
            for (i, phi) in ar.iter().enumerate().take(j) {
                w += phi * psi[j - 1 - i];
            }
            psi.push(w);
        }
        psi
    }
}

/// AR coefficients of `φ(B)(1 − B)ᵈ`, in the `1 − Σφᵢ*Bⁱ` convention.
fn integrated_ar(ar: &[f64], d: usize) -> Vec<f64> {
    let mut poly = Vec::with_capacity(ar.len() + d + 1);
    poly.push(1.0);
    poly.extend(ar.iter().map(|a| -a));
    for _ in 0..d {
        let mut next = vec![0.0; poly.len() + 1];
        for (i, c) in poly.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c;
        }
        poly = next;
    }
    poly[1..].iter().map(|c| -c).collect()
}

/// Outcome of fitting on a leading sample and forecasting the rest.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HoldoutReport {
    pub model: ArimaModel,
    pub forecast: ForecastResult,
    pub metrics: AccuracyMetrics,
}

/// Fit `spec` on all but the last `test_len` observations and score the
/// forecast of those observations.
pub fn evaluate_holdout(series: &TimeSeries, spec: ArimaSpec, test_len: usize) -> Result<HoldoutReport> {
    if test_len == 0 {
        return Err(EstimationError::InvalidHorizon { steps: test_len });
    }
    let train_len = series.len().checked_sub(test_len).ok_or_else(|| {
        EstimationError::InvalidParameter(format!(
            "hold-out of {test_len} exceeds series length {}",
            series.len()
        ))
    })?;
    let (train, test) = series.split_at(train_len)?;
    let model = spec.fit(&train)?;
    let forecast = model.forecast(test_len, HOLDOUT_LEVEL)?;
    let metrics = calculate_metrics(test.values(), forecast.point())?;
    Ok(HoldoutReport {
        model,
        forecast,
        metrics,
    })
}
