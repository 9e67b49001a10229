//! Diagnostic tests for model residuals.
//!
//! # Example
//!
//! ```
//! use anofox_estimate::validation::{durbin_watson, ljung_box};
//!
//! let residuals = vec![0.1, -0.2, 0.15, -0.1, 0.05, -0.08, 0.12, -0.15, 0.1, -0.05];
//! let lb = ljung_box(&residuals, Some(3), 0).unwrap();
//! println!("Ljung-Box Q = {:.3}, p = {:.3}", lb.statistic, lb.p_value);
//!
//! let dw = durbin_watson(&residuals).unwrap();
//! assert!(dw.statistic > 2.0);
//! ```

pub mod normality;

pub use normality::{normality_test, NormalityTest};
pub use residual_tests::{
    durbin_watson, ljung_box, AutocorrelationType, DurbinWatsonResult, LjungBoxResult,
};
