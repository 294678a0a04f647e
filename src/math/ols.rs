//! Least squares solver.
//!
//! We solve small problems of the form:
//!
//! ```text
//! minimize ||y - X β||²
//! ```
//!
//! Implementation choices:
//! - SVD rather than normal equations, so weather features that move together
//!   (dew point tracks temperature closely) do not blow up the solution.
//! - Singular values below a relative tolerance are treated as zero, which
//!   turns the solve into a pseudo-inverse: for rank-deficient designs we get
//!   the minimum-norm β among all least-squares solutions.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)

use nalgebra::{DMatrix, DVector};

/// Solution of a least squares problem.
#[derive(Debug, Clone)]
pub struct LeastSquares {
    pub beta: DVector<f64>,
    /// Numerical rank of `X` under the tolerance used for the solve.
    pub rank: usize,
}

/// Relative cut-off for singular values, `σ_max · max(n, k) · ε`.
pub fn rank_tolerance(sigma_max: f64, nrows: usize, ncols: usize) -> f64 {
    sigma_max * nrows.max(ncols) as f64 * f64::EPSILON
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` for an empty system or if the solution is not finite.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<LeastSquares> {
    if x.nrows() == 0 || x.ncols() == 0 || x.nrows() != y.len() {
        return None;
    }

    let svd = x.clone().svd(true, true);
    let tol = rank_tolerance(svd.singular_values.max(), x.nrows(), x.ncols());
    let rank = svd.rank(tol);

    let beta = svd.solve(y, tol).ok()?;
    if !beta.iter().all(|v| v.is_finite()) {
        return None;
    }

    Some(LeastSquares { beta, rank })
}
