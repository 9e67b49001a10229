//! # anofox-estimate
//!
//! Statistical estimation engine: ordinary least squares with full
//! inference, classical seasonal decomposition, and ARIMA estimation and
//! forecasting.
//!
//! All estimators are pure functions of their inputs and return immutable
//! result objects. Logging goes through `tracing`; installing a subscriber
//! is left to the caller.

#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod distributions;
pub mod error;
pub mod linalg;
pub mod models;
pub mod regression;
pub mod seasonality;
pub mod utils;
pub mod validation;

pub use error::{EstimationError, Result};

pub mod prelude {
    pub use crate::core::{ForecastResult, Frequency, TimeSeries};
    pub use crate::error::{EstimationError, Result};
    pub use crate::models::arima::{evaluate_holdout, ArimaConfig, ArimaModel, ArimaSpec};
    pub use crate::regression::{DesignMatrix, FittedOls, OlsConfig, OlsEstimator, PredictionResult};
    pub use crate::seasonality::{DecompositionModel, DecompositionResult, SeasonalDecomposer};
    pub use crate::utils::{calculate_metrics, AccuracyMetrics};
}
