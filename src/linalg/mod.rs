//! Dense linear algebra underlying the estimators.
//!
//! This module provides:
//! - `Matrix`: row-major dense matrix with products and transposes
//! - `QrDecomposition`: Householder QR with pivot-based rank detection
//! - `solve` / `inverse`: convenience wrappers over the QR factorization

mod matrix;
mod qr;

pub use matrix::{dot, Matrix};
pub use qr::{inverse, solve, QrDecomposition, DEFAULT_SINGULARITY_TOLERANCE};
