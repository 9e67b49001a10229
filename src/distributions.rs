//! CDF and quantile helpers for the reference distributions.
//!
//! Thin wrappers over `statrs` that turn test statistics into p-values and
//! confidence levels into critical values. Degrees of freedom are validated
//! and reported as [`EstimationError::InvalidParameter`].

use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, Normal, StudentsT};

use crate::error::{ensure_level, EstimationError, Result};

fn students_t(df: f64) -> Result<StudentsT> {
    StudentsT::new(0.0, 1.0, df).map_err(|e| {
        EstimationError::InvalidParameter(format!("student-t with {df} degrees of freedom: {e}"))
    })
}

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0)
        .map_err(|e| EstimationError::InvalidParameter(format!("standard normal: {e}")))
}

/// Student-t cumulative distribution function.
pub fn students_t_cdf(t: f64, df: f64) -> Result<f64> {
    Ok(students_t(df)?.cdf(t))
}

/// Two-sided p-value `P(|T| ≥ |t|)` for a Student-t statistic.
///
/// Infinite statistics (exact fits) yield 0.
pub fn t_two_sided_p_value(t: f64, df: f64) -> Result<f64> {
    let dist = students_t(df)?;
    if t.is_infinite() {
        return Ok(0.0);
    }
    Ok((2.0 * dist.sf(t.abs())).min(1.0))
}

/// Student-t quantile function.
pub fn t_quantile(p: f64, df: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(EstimationError::InvalidParameter(format!(
            "probability must be in (0, 1), got {p}"
        )));
    }
    Ok(students_t(df)?.inverse_cdf(p))
}

/// Two-sided Student-t critical value for a confidence level.
///
/// # Example
/// ```
/// use anofox_estimate::distributions::t_critical;
///
/// // Large df approaches the normal critical value
/// let t = t_critical(0.95, 10_000.0).unwrap();
/// assert!((t - 1.96).abs() < 0.01);
/// ```
pub fn t_critical(level: f64, df: f64) -> Result<f64> {
    ensure_level(level)?;
    t_quantile(0.5 + level / 2.0, df)
}

/// Upper tail probability `P(F ≥ f)` of the F distribution.
pub fn f_survival(f: f64, df_num: f64, df_den: f64) -> Result<f64> {
    let dist = FisherSnedecor::new(df_num, df_den).map_err(|e| {
        EstimationError::InvalidParameter(format!(
            "F({df_num}, {df_den}) distribution: {e}"
        ))
    })?;
    if f.is_infinite() {
        return Ok(0.0);
    }
    if f <= 0.0 {
        return Ok(1.0);
    }
    Ok(dist.sf(f))
}

/// Standard normal cumulative distribution function.
pub fn normal_cdf(z: f64) -> Result<f64> {
    Ok(standard_normal()?.cdf(z))
}

/// Standard normal quantile function.
pub fn normal_quantile(p: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(EstimationError::InvalidParameter(format!(
            "probability must be in (0, 1), got {p}"
        )));
    }
    Ok(standard_normal()?.inverse_cdf(p))
}

/// Two-sided standard normal critical value for a confidence level.
pub fn normal_critical(level: f64) -> Result<f64> {
    ensure_level(level)?;
    normal_quantile(0.5 + level / 2.0)
}

/// Upper tail probability of the chi-squared distribution.
pub fn chi_squared_survival(x: f64, df: f64) -> Result<f64> {
    let dist = ChiSquared::new(df).map_err(|e| {
        EstimationError::InvalidParameter(format!("chi-squared with {df} degrees of freedom: {e}"))
    })?;
    if x <= 0.0 {
        return Ok(1.0);
    }
    Ok(dist.sf(x))
}
