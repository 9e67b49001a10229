//! Design matrix construction for linear regression.

use std::collections::HashSet;

use crate::error::{ensure_finite, EstimationError, Result};
use crate::linalg::Matrix;

/// Name given to the prepended constant column.
pub const INTERCEPT_NAME: &str = "const";

/// Regressor matrix with named columns.
///
/// When built with an intercept the first column is all ones and is named
/// [`INTERCEPT_NAME`]. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DesignMatrix {
    matrix: Matrix,
    names: Vec<String>,
    has_intercept: bool,
}

impl DesignMatrix {
    /// Build a design from named predictor columns.
    ///
    /// Every column must have the same length and contain only finite
    /// values; names must be unique (and must not collide with `const` when
    /// an intercept is requested).
    pub fn from_columns<S: AsRef<str>>(
        names: &[S],
        columns: &[Vec<f64>],
        include_intercept: bool,
    ) -> Result<Self> {
        if columns.is_empty() {
            return Err(EstimationError::EmptyData);
        }
        if names.len() != columns.len() {
            return Err(EstimationError::DimensionMismatch {
                expected: columns.len(),
                got: names.len(),
            });
        }
        let n = columns[0].len();
        if n == 0 {
            return Err(EstimationError::EmptyData);
        }
        for col in columns {
            if col.len() != n {
                return Err(EstimationError::DimensionMismatch {
                    expected: n,
                    got: col.len(),
                });
            }
            ensure_finite(col)?;
        }

        let mut all_names = Vec::with_capacity(columns.len() + 1);
        if include_intercept {
            all_names.push(INTERCEPT_NAME.to_string());
        }
        let mut seen: HashSet<&str> = all_names.iter().map(String::as_str).collect();
        for name in names {
            if !seen.insert(name.as_ref()) {
                return Err(EstimationError::DuplicateName(name.as_ref().to_string()));
            }
        }
        all_names.extend(names.iter().map(|s| s.as_ref().to_string()));

        let width = all_names.len();
        let mut data = Vec::with_capacity(n * width);
        for i in 0..n {
            if include_intercept {
                data.push(1.0);
            }
            data.extend(columns.iter().map(|c| c[i]));
        }

        Ok(Self {
            matrix: Matrix::from_row_major(n, width, data)?,
            names: all_names,
            has_intercept: include_intercept,
        })
    }

    /// Build a design from unnamed predictor columns, naming them `x1`, `x2`, ...
    pub fn from_predictors(columns: &[Vec<f64>], include_intercept: bool) -> Result<Self> {
        let names: Vec<String> = (1..=columns.len()).map(|i| format!("x{i}")).collect();
        Self::from_columns(&names, columns, include_intercept)
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Column names, including `const` when present.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn has_intercept(&self) -> bool {
        self.has_intercept
    }

    /// Number of observations (rows).
    pub fn n_obs(&self) -> usize {
        self.matrix.rows()
    }

    /// Number of design columns, including the intercept.
    pub fn n_columns(&self) -> usize {
        self.matrix.cols()
    }

    /// Number of predictors, excluding the intercept.
    pub fn n_predictors(&self) -> usize {
        self.n_columns() - usize::from(self.has_intercept)
    }

    /// Expand a row of predictor values into a full design row.
    pub(crate) fn expand_row(&self, predictors: &[f64]) -> Result<Vec<f64>> {
        if predictors.len() != self.n_predictors() {
            return Err(EstimationError::DimensionMismatch {
                expected: self.n_predictors(),
                got: predictors.len(),
            });
        }
        ensure_finite(predictors)?;
        let mut row = Vec::with_capacity(self.n_columns());
        if self.has_intercept {
            row.push(1.0);
        }
        row.extend_from_slice(predictors);
        Ok(row)
    }
}
