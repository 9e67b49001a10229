//! Error types for the anofox-estimate library.

use thiserror::Error;

/// Result type alias for estimation operations.
pub type Result<T> = std::result::Result<T, EstimationError>;

/// Errors that can occur while fitting or using a statistical model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimationError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Sample size below the minimum required for the requested model shape.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Matrix is numerically rank-deficient.
    #[error("singular matrix: pivot {pivot:e} below threshold {threshold:e}")]
    SingularMatrix { pivot: f64, threshold: f64 },

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Likelihood optimization did not stabilize within the iteration budget.
    #[error("optimizer did not converge after {iterations} iterations")]
    NonConvergence { iterations: usize },

    /// Estimated parameters violate stationarity or invertibility.
    #[error("estimated {component} polynomial has roots inside the unit circle")]
    NonStationary { component: &'static str },

    /// Non-positive forecast horizon.
    #[error("invalid forecast horizon: {steps}")]
    InvalidHorizon { steps: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Missing or non-finite values detected when not allowed.
    #[error("missing or non-finite values detected in data")]
    MissingValues,

    /// Predictor names must be unique.
    #[error("duplicate predictor name: {0}")]
    DuplicateName(String),
}

/// Reject any NaN or infinite value.
pub(crate) fn ensure_finite(values: &[f64]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(EstimationError::MissingValues)
    }
}

/// Confidence levels must lie strictly between 0 and 1.
pub(crate) fn ensure_level(level: f64) -> Result<()> {
    if level > 0.0 && level < 1.0 {
        Ok(())
    } else {
        Err(EstimationError::InvalidParameter(format!(
            "confidence level must be in (0, 1), got {level}"
        )))
    }
}
