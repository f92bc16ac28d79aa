//! Corrected leave-one-out cross-validation
//!
//! The leave-one-out error of a least squares fit has a closed form: with `G = ΨᵀΨ` and the
//! diagonal `h_i = ψ(x_i)ᵀ G⁻¹ ψ(x_i)` of the hat matrix,
//!
//! ```text
//! err = 1/n Σ_i ((y_i - ŷ_i) / (1 - h_i))²
//! ```
//!
//! so no refit is needed. The estimate is multiplied by the correction factor
//! `n / (n - p) (1 + tr(G⁻¹))` of Chapelle et al. which compensates the optimism of the
//! empirical error on small samples.
use linfa_linalg::cholesky::Cholesky;
use linfa_linalg::triangular::{SolveTriangularInplace, UPLO};
use ndarray::{Array2, ArrayBase, Axis, Data, Ix2};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use polychaos::dataset::{check_basis_dimension, check_equal_size, output_variance, single_output};
use polychaos::{traits::FittingAlgorithm, Basis, Float, Sample};

use crate::error::{FittingError, Result};

/// Corrected leave-one-out cross-validation, a [`FittingAlgorithm`]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CorrectedLeaveOneOut;

impl<F: Float> FittingAlgorithm<F> for CorrectedLeaveOneOut {
    type Error = FittingError;

    /// Estimate the relative leave-one-out error of a least squares fit on `basis`
    ///
    /// # Errors
    ///
    /// * `InvalidArgument` if `y` is not unidimensional, sizes differ or the dimension of
    ///   `x` does not match the basis
    /// * [`NotEnoughSamples`](FittingError::NotEnoughSamples) unless there are more
    ///   observations than basis functions
    /// * [`NullVariance`](FittingError::NullVariance) for constant outputs
    /// * `LinalgError` if the Gram matrix is not positive definite
    fn run<D, T>(&self, x: &ArrayBase<D, Ix2>, y: &ArrayBase<T, Ix2>, basis: &Basis<F>) -> Result<F>
    where
        D: Data<Elem = F>,
        T: Data<Elem = F>,
    {
        let targets = single_output(y)?;
        check_equal_size(x, y)?;
        check_basis_dimension(x, basis)?;

        let (size, basis_size) = (x.size(), basis.len());
        if size <= basis_size {
            return Err(FittingError::NotEnoughSamples { size, basis_size });
        }
        let variance = output_variance(targets);
        if variance.is_nan() || variance <= F::zero() {
            return Err(FittingError::NullVariance);
        }

        let design = basis.design_matrix(x)?;
        let inverse_gram = invert_spd(&design.t().dot(&design))?;

        let coefficients = inverse_gram.dot(&design.t().dot(&targets));
        let predictions = design.dot(&coefficients);
        let leverages = (&design.dot(&inverse_gram) * &design).sum_axis(Axis(1));

        let empirical_error = targets
            .iter()
            .zip(predictions.iter())
            .zip(leverages.iter())
            .map(|((&target, &prediction), &h)| {
                let r = (target - prediction) / (F::one() - h);
                r * r
            })
            .sum::<F>()
            / F::cast(size);

        let trace = inverse_gram.diag().sum();
        let correction = F::cast(size) / F::cast(size - basis_size) * (F::one() + trace);
        let relative_error = correction * empirical_error / variance;

        log::info!(
            "corrected leave-one-out error: empirical={} correction={} relative={}",
            empirical_error,
            correction,
            relative_error
        );

        Ok(relative_error)
    }
}

/// Inverse of a symmetric positive definite matrix
fn invert_spd<F: Float>(a: &Array2<F>) -> Result<Array2<F>> {
    let lower = a.cholesky()?;
    let mut inverse = Array2::eye(a.nrows());
    lower.solve_triangular_inplace(&mut inverse, UPLO::Lower)?;
    lower.t().solve_triangular_inplace(&mut inverse, UPLO::Upper)?;

    Ok(inverse)
}
