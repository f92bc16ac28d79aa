//! Incremental Cholesky factor of the active Gram matrix
//!
//! Least angle regression adds one predictor per iteration, so the square root `R` of the
//! Gram matrix `Ψ_Aᵀ Ψ_A` of the active columns can be extended by one row and one column
//! instead of being recomputed. `R` is upper triangular and satisfies `Rᵀ R = Ψ_Aᵀ Ψ_A`.
use linfa_linalg::triangular::{SolveTriangularInplace, UPLO};
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};
use polychaos::Float;

use crate::error::{LarsError, Result};

/// Extend the factor of the Gram matrix of `active` with the column `column`
///
/// `factor` is the upper triangular factor of `activeᵀ active`, `None` when the active set
/// is empty. `index` is the position of `column` in the design matrix and only serves
/// error reporting.
///
/// Solving `Rᵀ r_k = activeᵀ x_k` costs O(p²), against O(p³) for a fresh factorization.
///
/// # Errors
///
/// Returns [`LarsError::CollinearPredictor`] if `||x_k||² - r_kᵀ r_k` is not positive, in
/// which case the extended Gram matrix is not positive definite.
pub fn extend<F: Float>(
    factor: Option<&Array2<F>>,
    column: ArrayView1<'_, F>,
    active: ArrayView2<'_, F>,
    index: usize,
) -> Result<Array2<F>> {
    let diag = column.dot(&column);

    let (off_diagonal, discriminant) = match factor {
        None => (Array1::zeros(0), diag),
        Some(r) => {
            debug_assert_eq!(r.nrows(), active.ncols());
            let mut rk = active.t().dot(&column).insert_axis(Axis(1));
            r.t().solve_triangular_inplace(&mut rk, UPLO::Lower)?;
            let rk = rk.remove_axis(Axis(1));
            let discriminant = diag - rk.dot(&rk);
            (rk, discriminant)
        }
    };

    if discriminant.is_nan() || discriminant <= F::zero() {
        return Err(LarsError::CollinearPredictor {
            index,
            discriminant: discriminant.to_f64().unwrap_or(f64::NAN),
        });
    }

    let p = off_diagonal.len();
    let mut extended = Array2::zeros((p + 1, p + 1));
    if let Some(r) = factor {
        extended.slice_mut(s![..p, ..p]).assign(r);
    }
    extended.slice_mut(s![..p, p]).assign(&off_diagonal);
    extended[[p, p]] = discriminant.sqrt();

    log::trace!("extended Cholesky factor to size {}", p + 1);

    Ok(extended)
}

/// Solve `Rᵀ R x = rhs` by forward then backward substitution
pub fn solve_normal<F: Float>(factor: &Array2<F>, rhs: ArrayView1<'_, F>) -> Result<Array1<F>> {
    let mut x = rhs.to_owned().insert_axis(Axis(1));
    factor.t().solve_triangular_inplace(&mut x, UPLO::Lower)?;
    factor.solve_triangular_inplace(&mut x, UPLO::Upper)?;

    Ok(x.remove_axis(Axis(1)))
}
