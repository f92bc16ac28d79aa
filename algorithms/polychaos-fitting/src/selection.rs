//! Metamodel selection along a basis sequence
use ndarray::{Array1, ArrayBase, Data, Ix2};

use polychaos::traits::{BasisSequenceFactory, FittingAlgorithm};
use polychaos::{Basis, Float, LinearCombination, ParamGuard};

use crate::error::{FittingError, Result};
use crate::least_squares::LeastSquaresApproximation;

/// Picks the entry of a basis sequence with the smallest cross-validation error
///
/// The sequence is built by `B`, typically least angle regression, and every entry is
/// scored by `A`, typically [`KFold`](crate::KFold) or
/// [`CorrectedLeaveOneOut`](crate::CorrectedLeaveOneOut). The selected sub-basis is then
/// refitted by ordinary least squares on the whole sample.
#[derive(Clone, Debug, PartialEq)]
pub struct MetaModelSelection<B, A> {
    factory: B,
    fitting: A,
}

impl<B, A> MetaModelSelection<B, A> {
    pub fn new(factory: B, fitting: A) -> Self {
        MetaModelSelection { factory, fitting }
    }

    pub fn factory(&self) -> &B {
        &self.factory
    }

    pub fn fitting(&self) -> &A {
        &self.fitting
    }

    /// Build the basis sequence of `psi` and select its best entry
    ///
    /// Ties keep the entry coming first in the sequence, that is the smallest basis.
    ///
    /// # Errors
    ///
    /// * [`Factory`](FittingError::Factory) if the sequence cannot be built
    /// * [`EmptySequence`](FittingError::EmptySequence) if it has no entry
    /// * any error of the fitting algorithm or of the final least squares fit
    pub fn select<F, D, T>(
        &self,
        x: &ArrayBase<D, Ix2>,
        y: &ArrayBase<T, Ix2>,
        psi: &Basis<F>,
    ) -> Result<SelectedMetaModel<F>>
    where
        F: Float,
        D: Data<Elem = F>,
        T: Data<Elem = F>,
        B: BasisSequenceFactory<F>,
        B::Error: Send + Sync + 'static,
        A: FittingAlgorithm<F>,
        FittingError: From<A::Error>,
    {
        let sequence = self
            .factory
            .build(x, y, psi)
            .map_err(|err| FittingError::Factory(Box::new(err)))?;
        if sequence.is_empty() {
            return Err(FittingError::EmptySequence);
        }

        let mut errors = Vec::with_capacity(sequence.len());
        for i in 0..sequence.len() {
            let error = self.fitting.run(x, y, &sequence.basis(i))?;
            log::debug!(
                "entry {} with {} functions: relative error={}",
                i,
                sequence.indices(i).len(),
                error
            );
            errors.push(error);
        }

        let (index, relative_error) = errors.iter().enumerate().skip(1).fold(
            (0, errors[0]),
            |(best, minimum), (i, &error)| {
                if error < minimum {
                    (i, error)
                } else {
                    (best, minimum)
                }
            },
        );

        let metamodel = LeastSquaresApproximation::params()
            .check()?
            .fit(x, y, &sequence.basis(index))?
            .into_metamodel();

        log::info!(
            "selected entry {} over {} with indices {:?}, relative error={}",
            index,
            sequence.len(),
            sequence.indices(index),
            relative_error
        );

        Ok(SelectedMetaModel {
            index,
            indices: sequence.indices(index).to_vec(),
            relative_error,
            errors: Array1::from(errors),
            metamodel,
        })
    }
}

/// Outcome of a [`MetaModelSelection`]
#[derive(Clone, Debug)]
pub struct SelectedMetaModel<F> {
    index: usize,
    indices: Vec<usize>,
    relative_error: F,
    errors: Array1<F>,
    metamodel: LinearCombination<F>,
}

impl<F: Float> SelectedMetaModel<F> {
    /// Position of the selected entry in the basis sequence
    pub fn index(&self) -> usize {
        self.index
    }

    /// Indices of the selected functions in the master basis
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn relative_error(&self) -> F {
        self.relative_error
    }

    /// Relative error of every entry of the sequence
    pub fn errors(&self) -> &Array1<F> {
        &self.errors
    }

    pub fn metamodel(&self) -> &LinearCombination<F> {
        &self.metamodel
    }

    pub fn into_metamodel(self) -> LinearCombination<F> {
        self.metamodel
    }
}
