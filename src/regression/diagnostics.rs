//! Collinearity and residual diagnostics for fitted regressions.

use tracing::warn;

use super::design::DesignMatrix;
use super::ols::FittedOls;
use crate::error::{EstimationError, Result};
use crate::linalg::{Matrix, QrDecomposition};
use crate::utils::stats::{mean, population_std_dev};

/// Auxiliary residual sum of squares at or below this fraction of the total
/// means the column is an exact combination of the others.
const COLLINEAR_TOLERANCE: f64 = 1e-24;

/// Variance inflation factor of one design column.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarianceInflation {
    pub name: String,
    pub vif: f64,
}

/// Compute the VIF of every column of a design, the constant included.
///
/// Column `j` is regressed on the remaining columns as given (no constant
/// is added) and `VIF_j = 1 / (1 - R²_j)`. The R² is centered when the
/// remaining columns contain the constant and uncentered otherwise.
///
/// Values above 10 usually indicate problematic collinearity. Exactly
/// collinear columns give an infinite VIF.
pub fn variance_inflation_factors(design: &DesignMatrix) -> Result<Vec<VarianceInflation>> {
    let columns: Vec<Vec<f64>> = (0..design.n_columns())
        .map(|j| design.matrix().column(j))
        .collect();

    columns
        .iter()
        .enumerate()
        .map(|(j, target)| {
            let vif = if columns.len() == 1 {
                1.0
            } else {
                let centered = design.has_intercept() && j != 0;
                column_vif(target, &columns, j, centered)?
            };
            if vif.is_infinite() {
                warn!(column = %design.names()[j], "column is exactly collinear with the others");
            }
            Ok(VarianceInflation {
                name: design.names()[j].clone(),
                vif,
            })
        })
        .collect()
}

fn column_vif(target: &[f64], columns: &[Vec<f64>], skip: usize, centered: bool) -> Result<f64> {
    let others: Vec<Vec<f64>> = columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != skip)
        .map(|(_, c)| c.clone())
        .collect();
    let x = Matrix::from_columns(&others)?;

    let beta = match QrDecomposition::new(&x) {
        Ok(qr) => qr.solve(target)?,
        Err(EstimationError::SingularMatrix { .. }) => return Ok(f64::INFINITY),
        Err(e) => return Err(e),
    };
    let fitted = x.mul_vec(&beta)?;
    let ssr: f64 = target.iter().zip(&fitted).map(|(a, f)| (a - f).powi(2)).sum();
    let sst: f64 = if centered {
        let m = mean(target);
        target.iter().map(|v| (v - m).powi(2)).sum()
    } else {
        target.iter().map(|v| v * v).sum()
    };

    if ssr <= COLLINEAR_TOLERANCE * sst {
        return Ok(f64::INFINITY);
    }
    Ok(sst / ssr)
}

/// Location and spread of the residuals.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResidualSummary {
    pub mean: f64,
    /// Population standard deviation (n denominator).
    pub std_dev: f64,
}

impl FittedOls {
    pub fn residual_summary(&self) -> ResidualSummary {
        ResidualSummary {
            mean: mean(self.residuals()),
            std_dev: population_std_dev(self.residuals()),
        }
    }

    /// VIFs of the design this model was fit on.
    pub fn variance_inflation_factors(&self) -> Result<Vec<VarianceInflation>> {
        variance_inflation_factors(self.design())
    }
}
