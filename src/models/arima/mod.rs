//! ARIMA (Autoregressive Integrated Moving Average) models.
//!
//! This module provides:
//! - `ArimaSpec` / `ArimaModel`: conditional-likelihood estimation of ARIMA(p, d, q)
//! - Forecasting with impulse-response (ψ-weight) intervals
//! - Differencing, Yule-Walker seeding and stationarity checks
//! - A partial-autocorrelation search space that keeps estimates stationary
//!   and invertible
//! - Hold-out evaluation against trailing observations

mod diff;
mod forecast;
mod model;
mod params;
mod yule_walker;

pub use diff::{difference, integrate};
pub use forecast::{evaluate_holdout, HoldoutReport};
pub use model::{ArimaConfig, ArimaModel, ArimaSpec};
pub use yule_walker::{autocovariances, is_invertible, is_stationary, levinson_durbin, yule_walker};
