//! Samples
//!
//! Input and output samples are two-dimensional `ndarray` matrices holding one observation
//! per row. This module implements the floating point bound shared by every algorithm and
//! the checks applied to samples before an algorithm touches them.
use ndarray::{ArrayBase, ArrayView1, Axis, Data, Ix2, NdFloat};

use num_traits::{FromPrimitive, NumCast};

use std::iter::Sum;

use crate::error::{Error, Result};
use crate::Basis;

/// Floating point numbers
///
/// This trait bound multiplexes to the most common assumption of floating point number and
/// implement them for 32bit and 64bit floating points. They are used in input samples,
/// output samples, design matrices and coefficients.
pub trait Float: NdFloat + FromPrimitive + Default + Sum + approx::AbsDiffEq<Epsilon = Self> {
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f32 {}

impl Float for f64 {}

/// Shape of a sample
pub trait Sample {
    type Elem;

    /// Number of observations
    fn size(&self) -> usize;
    /// Length of a single observation
    fn dimension(&self) -> usize;
}

impl<F, S: Data<Elem = F>> Sample for ArrayBase<S, Ix2> {
    type Elem = F;

    fn size(&self) -> usize {
        self.nrows()
    }

    fn dimension(&self) -> usize {
        self.ncols()
    }
}

/// Returns the single column of an output sample
///
/// # Errors
///
/// Returns `Error::InvalidArgument` if `y` has more or less than one column.
pub fn single_output<F, S: Data<Elem = F>>(y: &ArrayBase<S, Ix2>) -> Result<ArrayView1<'_, F>> {
    if y.dimension() != 1 {
        return Err(Error::InvalidArgument(format!(
            "output sample should be unidimensional (dim={})",
            y.dimension()
        )));
    }

    Ok(y.index_axis(Axis(1), 0))
}

/// Checks that input and output samples hold the same number of observations
pub fn check_equal_size<F, D, T>(x: &ArrayBase<D, Ix2>, y: &ArrayBase<T, Ix2>) -> Result<()>
where
    D: Data<Elem = F>,
    T: Data<Elem = F>,
{
    if x.size() != y.size() {
        return Err(Error::InvalidArgument(format!(
            "samples should be equally sized (in={} out={})",
            x.size(),
            y.size()
        )));
    }

    Ok(())
}

/// Checks that every observation of `x` can be fed to the functions of `basis`
pub fn check_basis_dimension<F: Float, D: Data<Elem = F>>(
    x: &ArrayBase<D, Ix2>,
    basis: &Basis<F>,
) -> Result<()> {
    if x.dimension() != basis.dimension() {
        return Err(Error::InvalidArgument(format!(
            "sample dimension ({}) does not match basis dimension ({})",
            x.dimension(),
            basis.dimension()
        )));
    }

    Ok(())
}

/// Unbiased variance of an output column
///
/// Returns `NaN` for less than two observations.
pub fn output_variance<F: Float>(y: ArrayView1<'_, F>) -> F {
    if y.len() < 2 {
        return F::nan();
    }

    y.var(F::one())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};

    #[test]
    fn sample_shape_follows_rows_and_columns() {
        let x = Array2::<f64>::zeros((5, 3));
        assert_eq!(x.size(), 5);
        assert_eq!(x.dimension(), 3);
        assert_eq!(x.view().size(), 5);
    }

    #[test]
    fn single_output_rejects_multidimensional_samples() {
        let y = array![[1.0, 2.0], [3.0, 4.0]];
        assert!(matches!(single_output(&y), Err(Error::InvalidArgument(_))));

        let y = array![[1.0], [3.0]];
        assert_eq!(single_output(&y).unwrap(), array![1.0, 3.0]);
    }

    #[test]
    fn mismatched_sizes_are_invalid() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![[1.0], [2.0]];
        assert!(check_equal_size(&x, &y).is_err());
        assert!(check_equal_size(&x, &x).is_ok());
    }

    #[test]
    fn basis_dimension_is_checked() {
        let x = array![[1.0, 2.0], [2.0, 3.0]];
        assert!(check_basis_dimension(&x, &Basis::linear(2)).is_ok());
        assert!(check_basis_dimension(&x, &Basis::monomials(3)).is_err());
    }

    #[test]
    fn variance_is_unbiased() {
        let y = array![1.0, 2.0, 3.0, 4.0];
        assert_abs_diff_eq!(output_variance(y.view()), 5.0 / 3.0, epsilon = 1e-12);
        assert!(output_variance(array![1.0f64].view()).is_nan());
    }
}
