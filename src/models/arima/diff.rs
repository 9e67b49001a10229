//! Differencing and its inverse.

use crate::error::{EstimationError, Result};

/// Apply the difference operator `d` times (`Δyₜ = yₜ − yₜ₋₁`).
///
/// Each pass shortens the series by one; an exhausted series stays empty.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.is_empty() {
            break;
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Undo `d` differences for values that continue past the end of `original`.
///
/// The last observation of each intermediate differenced series seeds the
/// cumulative sum at that level, so the result continues `original`.
pub fn integrate(differenced: &[f64], original: &[f64], d: usize) -> Result<Vec<f64>> {
    if original.len() <= d {
        return Err(EstimationError::InsufficientData {
            needed: d + 1,
            got: original.len(),
        });
    }

    let mut result = differenced.to_vec();
    for level in (0..d).rev() {
        let intermediate = difference(original, level);
        let mut acc = intermediate[intermediate.len() - 1];
        for v in result.iter_mut() {
            acc += *v;
            *v = acc;
        }
    }
    Ok(result)
}
