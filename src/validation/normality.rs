//! D'Agostino-Pearson omnibus test of normality.

use crate::distributions::chi_squared_survival;
use crate::error::{ensure_finite, EstimationError, Result};

/// Smallest sample the skewness transform is valid for.
const MIN_OBSERVATIONS: usize = 8;

/// Result of the omnibus normality test.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalityTest {
    /// K² = Z(skewness)² + Z(kurtosis)²
    pub statistic: f64,
    /// Chi-squared (2 df) tail probability of K².
    pub p_value: f64,
    /// Sample skewness `m₃ / m₂^{3/2}`.
    pub skewness: f64,
    /// Sample kurtosis `m₄ / m₂²` (3 for a normal distribution).
    pub kurtosis: f64,
    pub skewness_z: f64,
    pub kurtosis_z: f64,
}

impl NormalityTest {
    /// True when normality is not rejected at `alpha`.
    pub fn is_normal(&self, alpha: f64) -> bool {
        self.p_value > alpha
    }
}

/// Test whether `values` come from a normal distribution.
///
/// Skewness is transformed with D'Agostino's Johnson SU approximation and
/// kurtosis with Anscombe-Glynn; the sum of their squared z-scores is
/// chi-squared with 2 degrees of freedom under normality.
pub fn normality_test(values: &[f64]) -> Result<NormalityTest> {
    let n = values.len();
    if n < MIN_OBSERVATIONS {
        return Err(EstimationError::InsufficientData {
            needed: MIN_OBSERVATIONS,
            got: n,
        });
    }
    ensure_finite(values)?;

    let nf = n as f64;
    let m = values.iter().sum::<f64>() / nf;
    let moment = |k: i32| values.iter().map(|v| (v - m).powi(k)).sum::<f64>() / nf;
    let m2 = moment(2);
    if m2 == 0.0 {
        return Err(EstimationError::InvalidParameter(
            "normality test needs non-constant data".into(),
        ));
    }
    let skewness = moment(3) / m2.powf(1.5);
    let kurtosis = moment(4) / (m2 * m2);

    let skewness_z = skewness_z(skewness, nf);
    let kurtosis_z = kurtosis_z(kurtosis, nf);
    let statistic = skewness_z * skewness_z + kurtosis_z * kurtosis_z;

    Ok(NormalityTest {
        statistic,
        p_value: chi_squared_survival(statistic, 2.0)?,
        skewness,
        kurtosis,
        skewness_z,
        kurtosis_z,
    })
}

fn skewness_z(b1: f64, n: f64) -> f64 {
    let y = b1 * ((n + 1.0) * (n + 3.0) / (6.0 * (n - 2.0))).sqrt();
    let beta2 = 3.0 * (n * n + 27.0 * n - 70.0) * (n + 1.0) * (n + 3.0)
        / ((n - 2.0) * (n + 5.0) * (n + 7.0) * (n + 9.0));
    let w2 = -1.0 + (2.0 * (beta2 - 1.0)).sqrt();
    let delta = 1.0 / (0.5 * w2.ln()).sqrt();
    let alpha = (2.0 / (w2 - 1.0)).sqrt();
    delta * (y / alpha).asinh()
}

fn kurtosis_z(b2: f64, n: f64) -> f64 {
    let expected = 3.0 * (n - 1.0) / (n + 1.0);
    let variance =
        24.0 * n * (n - 2.0) * (n - 3.0) / ((n + 1.0).powi(2) * (n + 3.0) * (n + 5.0));
    let x = (b2 - expected) / variance.sqrt();
    let sqrt_beta1 = 6.0 * (n * n - 5.0 * n + 2.0) / ((n + 7.0) * (n + 9.0))
        * (6.0 * (n + 3.0) * (n + 5.0) / (n * (n - 2.0) * (n - 3.0))).sqrt();
    let a = 6.0
        + 8.0 / sqrt_beta1 * (2.0 / sqrt_beta1 + (1.0 + 4.0 / (sqrt_beta1 * sqrt_beta1)).sqrt());
    let term1 = 1.0 - 2.0 / (9.0 * a);
    let denom = 1.0 + x * (2.0 / (a - 4.0)).sqrt();
    let term2 = denom.signum() * ((1.0 - 2.0 / a) / denom.abs()).cbrt();
    (term1 - term2) / (2.0 / (9.0 * a)).sqrt()
}
