use ndarray::{Array1, ArrayBase, Data, Ix2};

use crate::error::{Error, Result};
use crate::{Basis, Float};

/// A metamodel `x -> Σ_j a_j ψ_j(x)`
#[derive(Clone, Debug)]
pub struct LinearCombination<F> {
    basis: Basis<F>,
    coefficients: Array1<F>,
}

impl<F: Float> LinearCombination<F> {
    /// Combine `basis` with one coefficient per function
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the lengths differ.
    pub fn new(basis: Basis<F>, coefficients: Array1<F>) -> Result<Self> {
        if basis.len() != coefficients.len() {
            return Err(Error::InvalidArgument(format!(
                "basis size ({}) does not match the number of coefficients ({})",
                basis.len(),
                coefficients.len()
            )));
        }

        Ok(LinearCombination {
            basis,
            coefficients,
        })
    }

    pub fn basis(&self) -> &Basis<F> {
        &self.basis
    }

    pub fn coefficients(&self) -> &Array1<F> {
        &self.coefficients
    }

    /// Evaluate the metamodel at every observation of `x`
    ///
    /// The input sample `x` must have shape `(n_samples, self.basis().dimension())`.
    pub fn evaluate<D: Data<Elem = F>>(&self, x: &ArrayBase<D, Ix2>) -> Result<Array1<F>> {
        let psi = self.basis.design_matrix(x)?;

        Ok(psi.dot(&self.coefficients))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn evaluates_weighted_sum_of_functions() {
        let model = LinearCombination::new(Basis::<f64>::monomials(2), array![1.0, 0.0, 2.0])
            .unwrap();
        let y = model.evaluate(&array![[0.0], [1.0], [3.0]]).unwrap();
        assert_abs_diff_eq!(y, array![1.0, 3.0, 19.0]);
    }

    #[test]
    fn coefficient_count_must_match_basis() {
        assert!(LinearCombination::new(Basis::<f64>::monomials(2), array![1.0]).is_err());
    }
}
