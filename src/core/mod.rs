//! Core data structures shared by the time-series estimators.

mod forecast;
mod time_series;

pub use forecast::{ForecastPoint, ForecastResult};
pub use time_series::{Frequency, TimeSeries};
