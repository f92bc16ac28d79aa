//! Basis functions and design matrices
//!
//! A [`Basis`] is an ordered collection of scalar functions sharing one input dimension.
//! Evaluating every function at every observation of a sample yields the design matrix
//! `Ψ` with `Ψ[i, j] = ψ_j(x_i)`, the input of every regression in this workspace.
use std::fmt;
use std::sync::Arc;

use ndarray::{Array2, ArrayBase, ArrayView1, Data, Ix2};

use crate::dataset::check_basis_dimension;
use crate::error::{Error, Result};
use crate::Float;

mod combination;
mod sequence;

pub use combination::LinearCombination;
pub use sequence::BasisSequence;

type Evaluation<F> = dyn Fn(ArrayView1<'_, F>) -> F + Send + Sync;

/// A scalar function of a fixed-dimensional input
///
/// The function is reference counted, cloning a basis function or a basis never copies
/// the underlying closure.
#[derive(Clone)]
pub struct BasisFunction<F> {
    dimension: usize,
    evaluation: Arc<Evaluation<F>>,
}

impl<F: Float> BasisFunction<F> {
    /// Wrap a closure accepting `dimension`-long observations
    pub fn new<E>(dimension: usize, evaluation: E) -> Self
    where
        E: Fn(ArrayView1<'_, F>) -> F + Send + Sync + 'static,
    {
        BasisFunction {
            dimension,
            evaluation: Arc::new(evaluation),
        }
    }

    /// The constant function `1`
    pub fn constant(dimension: usize) -> Self {
        BasisFunction::new(dimension, |_| F::one())
    }

    /// Input dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Evaluate the function at a single observation
    pub fn evaluate(&self, point: ArrayView1<'_, F>) -> F {
        (self.evaluation)(point)
    }
}

impl<F> fmt::Debug for BasisFunction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasisFunction")
            .field("dimension", &self.dimension)
            .finish()
    }
}

/// An ordered collection of basis functions of one common input dimension
#[derive(Clone, Debug)]
pub struct Basis<F> {
    dimension: usize,
    functions: Vec<BasisFunction<F>>,
}

impl<F: Float> Basis<F> {
    /// Create an empty basis of functions of `dimension` inputs
    pub fn new(dimension: usize) -> Self {
        Basis {
            dimension,
            functions: Vec::new(),
        }
    }

    /// Univariate monomials `1, x, x^2, ..., x^degree`
    pub fn monomials(degree: usize) -> Self {
        (0..=degree).fold(Basis::new(1), |basis, power| {
            let power = power as i32;
            basis.with_unchecked(BasisFunction::new(1, move |x: ArrayView1<'_, F>| {
                x[0].powi(power)
            }))
        })
    }

    /// Affine functions `1, x_1, ..., x_dimension`
    pub fn linear(dimension: usize) -> Self {
        (0..dimension).fold(
            Basis::new(dimension).with_unchecked(BasisFunction::constant(dimension)),
            |basis, coordinate| {
                basis.with_unchecked(BasisFunction::new(
                    dimension,
                    move |x: ArrayView1<'_, F>| x[coordinate],
                ))
            },
        )
    }

    /// Append a function to the basis
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the input dimension of `function` differs from
    /// the dimension of the basis.
    pub fn push(&mut self, function: BasisFunction<F>) -> Result<()> {
        if function.dimension() != self.dimension {
            return Err(Error::InvalidArgument(format!(
                "function dimension ({}) does not match basis dimension ({})",
                function.dimension(),
                self.dimension
            )));
        }
        self.functions.push(function);

        Ok(())
    }

    /// Builder variant of [`push`](Self::push)
    pub fn with(mut self, function: BasisFunction<F>) -> Result<Self> {
        self.push(function)?;
        Ok(self)
    }

    fn with_unchecked(mut self, function: BasisFunction<F>) -> Self {
        debug_assert_eq!(function.dimension(), self.dimension);
        self.functions.push(function);
        self
    }

    /// Number of functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Input dimension shared by all functions
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The function at position `index`, if any
    pub fn get(&self, index: usize) -> Option<&BasisFunction<F>> {
        self.functions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BasisFunction<F>> {
        self.functions.iter()
    }

    /// The basis made of the functions at `indices`, in the given order
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if an index is out of range.
    pub fn sub_basis(&self, indices: &[usize]) -> Result<Self> {
        let functions = indices
            .iter()
            .map(|&index| {
                self.functions.get(index).cloned().ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "index {} out of range for a basis of size {}",
                        index,
                        self.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Basis {
            dimension: self.dimension,
            functions,
        })
    }

    /// Evaluate every function at every observation of `x`
    ///
    /// The input sample `x` must have shape `(n_samples, self.dimension())`, the result
    /// has shape `(n_samples, self.len())`.
    pub fn design_matrix<D: Data<Elem = F>>(&self, x: &ArrayBase<D, Ix2>) -> Result<Array2<F>> {
        check_basis_dimension(x, self)?;
        log::trace!(
            "design matrix of {} observations over {} functions",
            x.nrows(),
            self.len()
        );

        Ok(Array2::from_shape_fn(
            (x.nrows(), self.len()),
            |(i, j)| self.functions[j].evaluate(x.row(i)),
        ))
    }
}
