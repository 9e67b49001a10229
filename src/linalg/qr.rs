//! Householder QR decomposition with rank detection.
//!
//! The factorization `A = QR` (A is m×n with m ≥ n) backs every solve in the
//! crate: square systems, least-squares problems and the unscaled covariance
//! `(AᵗA)⁻¹ = R⁻¹R⁻ᵗ` used by the regression inference. Forming `AᵗA`
//! explicitly squares the condition number, so it is never done here.

use super::matrix::Matrix;
use crate::error::{EstimationError, Result};

/// Default relative pivot tolerance for rank-deficiency detection.
pub const DEFAULT_SINGULARITY_TOLERANCE: f64 = 1e-12;

/// Householder QR factorization of a tall or square matrix.
#[derive(Debug, Clone)]
pub struct QrDecomposition {
    /// Householder vectors below the diagonal, strict upper part of R above.
    qr: Matrix,
    /// Diagonal of R.
    r_diag: Vec<f64>,
}

impl QrDecomposition {
    /// Factor `a` with the default singularity tolerance.
    pub fn new(a: &Matrix) -> Result<Self> {
        Self::with_tolerance(a, DEFAULT_SINGULARITY_TOLERANCE)
    }

    /// Factor `a`; fails with `SingularMatrix` when any pivot `|R_kk|` falls
    /// below `tolerance * max(|A|)`.
    pub fn with_tolerance(a: &Matrix, tolerance: f64) -> Result<Self> {
        let m = a.rows();
        let n = a.cols();
        if n == 0 || m == 0 {
            return Err(EstimationError::EmptyData);
        }
        if m < n {
            return Err(EstimationError::InsufficientData { needed: n, got: m });
        }

        let mut qr = a.clone();
        let mut r_diag = vec![0.0; n];

        for k in 0..n {
            let mut nrm = 0.0_f64;
            for i in k..m {
                nrm = nrm.hypot(qr[(i, k)]);
            }

            if nrm != 0.0 {
                if qr[(k, k)] < 0.0 {
                    nrm = -nrm;
                }
                for i in k..m {
                    qr[(i, k)] /= nrm;
                }
                qr[(k, k)] += 1.0;

                for j in (k + 1)..n {
                    let mut s = 0.0;
                    for i in k..m {
                        s += qr[(i, k)] * qr[(i, j)];
                    }
                    s = -s / qr[(k, k)];
                    for i in k..m {
                        let v = qr[(i, k)];
                        qr[(i, j)] += s * v;
                    }
                }
            }
            r_diag[k] = -nrm;
        }

        let threshold = tolerance * a.max_abs();
        for &pivot in &r_diag {
            if !(pivot.abs() > threshold) {
                return Err(EstimationError::SingularMatrix {
                    pivot: pivot.abs(),
                    threshold,
                });
            }
        }

        Ok(Self { qr, r_diag })
    }

    pub fn rows(&self) -> usize {
        self.qr.rows()
    }

    pub fn cols(&self) -> usize {
        self.qr.cols()
    }

    /// Upper-triangular factor R (n×n).
    pub fn r(&self) -> Matrix {
        let n = self.cols();
        let mut r = Matrix::zeros(n, n);
        for i in 0..n {
            r[(i, i)] = self.r_diag[i];
            for j in (i + 1)..n {
                r[(i, j)] = self.qr[(i, j)];
            }
        }
        r
    }

    /// Least-squares solution of `A x = b` (exact solution when A is square).
    pub fn solve(&self, b: &[f64]) -> Result<Vec<f64>> {
        let m = self.rows();
        let n = self.cols();
        if b.len() != m {
            return Err(EstimationError::DimensionMismatch {
                expected: m,
                got: b.len(),
            });
        }

        // y = Qᵗ b
        let mut y = b.to_vec();
        for k in 0..n {
            let mut s = 0.0;
            for i in k..m {
                s += self.qr[(i, k)] * y[i];
            }
            s = -s / self.qr[(k, k)];
            for i in k..m {
                y[i] += s * self.qr[(i, k)];
            }
        }

        // R x = y
        let mut x = y[..n].to_vec();
        for k in (0..n).rev() {
            x[k] /= self.r_diag[k];
            for i in 0..k {
                x[i] -= x[k] * self.qr[(i, k)];
            }
        }
        Ok(x)
    }

    /// Inverse of the triangular factor, R⁻¹.
    pub fn r_inverse(&self) -> Matrix {
        let n = self.cols();
        let r = self.r();
        let mut inv = Matrix::zeros(n, n);
        for j in 0..n {
            inv[(j, j)] = 1.0 / r[(j, j)];
            for i in (0..j).rev() {
                let mut s = 0.0;
                for k in (i + 1)..=j {
                    s += r[(i, k)] * inv[(k, j)];
                }
                inv[(i, j)] = -s / r[(i, i)];
            }
        }
        inv
    }

    /// `(AᵗA)⁻¹` computed as `R⁻¹R⁻ᵗ`.
    pub fn unscaled_covariance(&self) -> Matrix {
        let n = self.cols();
        let r_inv = self.r_inverse();
        let mut cov = Matrix::zeros(n, n);
        for i in 0..n {
            for j in i..n {
                let mut s = 0.0;
                for k in j..n {
                    s += r_inv[(i, k)] * r_inv[(j, k)];
                }
                cov[(i, j)] = s;
                cov[(j, i)] = s;
            }
        }
        cov
    }
}

/// Solve `A x = b`; least-squares when A has more rows than columns.
pub fn solve(a: &Matrix, b: &[f64]) -> Result<Vec<f64>> {
    QrDecomposition::new(a)?.solve(b)
}

/// Inverse of a square matrix via QR.
pub fn inverse(a: &Matrix) -> Result<Matrix> {
    if a.rows() != a.cols() {
        return Err(EstimationError::DimensionMismatch {
            expected: a.rows(),
            got: a.cols(),
        });
    }
    let qr = QrDecomposition::new(a)?;
    let n = a.rows();
    let mut inv = Matrix::zeros(n, n);
    let mut e = vec![0.0; n];
    for j in 0..n {
        e.iter_mut().for_each(|v| *v = 0.0);
        e[j] = 1.0;
        let col = qr.solve(&e)?;
        for (i, v) in col.into_iter().enumerate() {
            inv[(i, j)] = v;
        }
    }
    Ok(inv)
}
