//! Time-series models.

pub mod arima;

pub use arima::{ArimaConfig, ArimaModel, ArimaSpec};
