//! Seasonal decomposition.
//!
//! Classical additive decomposition splits a series into a moving-average
//! trend, a repeating seasonal pattern and a residual.

mod classical;

pub use classical::{DecompositionModel, DecompositionResult, SeasonalDecomposer};
