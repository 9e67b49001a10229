//! Linear regression by ordinary least squares.
//!
//! This module provides:
//! - `DesignMatrix`: named regressors with an optional constant column
//! - `OlsEstimator`: QR-based least squares producing a `FittedOls`
//! - `FittedOls::predict`: mean predictions with confidence intervals
//! - `diagnostics`: variance inflation factors and residual summaries
//!
//! # Example
//! ```
//! use anofox_estimate::regression::OlsEstimator;
//!
//! let x = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
//! let y = vec![2.1, 3.9, 6.2, 7.8, 10.1, 12.0];
//! let fit = OlsEstimator::new().fit_predictors(&y, &[x]).unwrap();
//!
//! assert!((fit.coefficients()[1] - 2.0).abs() < 0.1);
//! assert!(fit.r_squared() > 0.99);
//! ```

mod design;
pub mod diagnostics;
mod ols;
mod prediction;

pub use design::{DesignMatrix, INTERCEPT_NAME};
pub use diagnostics::{variance_inflation_factors, ResidualSummary, VarianceInflation};
pub use ols::{CoefficientRow, FittedOls, OlsConfig, OlsEstimator};
pub use prediction::PredictionResult;
