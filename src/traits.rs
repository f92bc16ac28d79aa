//! Provide traits for the algorithm crates of the workspace
//!
//! Path builders produce a [`BasisSequence`] from a sample and a master basis, fitting
//! algorithms score a single basis by a relative prediction error. Both are implemented on
//! checked parameter sets and forwarded from their unchecked counterparts through
//! [`ParamGuard`].

use ndarray::{ArrayBase, Data, Ix2};

use crate::{error::Error, param_guard::ParamGuard, Basis, BasisSequence, Float};

/// Builds a nested sequence of sub-bases of `psi`
///
/// The input sample `x` has shape `(n_samples, psi.dimension())`, the output sample `y`
/// has shape `(n_samples, 1)`.
pub trait BasisSequenceFactory<F: Float> {
    type Error: std::error::Error + From<Error>;

    fn build<D, T>(
        &self,
        x: &ArrayBase<D, Ix2>,
        y: &ArrayBase<T, Ix2>,
        psi: &Basis<F>,
    ) -> Result<BasisSequence<F>, Self::Error>
    where
        D: Data<Elem = F>,
        T: Data<Elem = F>;
}

/// Estimates the relative prediction error of a least-squares fit on `basis`
///
/// The returned value is normalized by the variance of `y`: values close to one mean the
/// basis does no better than the mean of the outputs, values close to zero indicate a
/// near-perfect fit.
pub trait FittingAlgorithm<F: Float> {
    type Error: std::error::Error + From<Error>;

    fn run<D, T>(
        &self,
        x: &ArrayBase<D, Ix2>,
        y: &ArrayBase<T, Ix2>,
        basis: &Basis<F>,
    ) -> Result<F, Self::Error>
    where
        D: Data<Elem = F>,
        T: Data<Elem = F>;
}

impl<F, P> BasisSequenceFactory<F> for P
where
    F: Float,
    P: ParamGuard,
    P::Checked: BasisSequenceFactory<F>,
    <P::Checked as BasisSequenceFactory<F>>::Error: From<P::Error>,
{
    type Error = <P::Checked as BasisSequenceFactory<F>>::Error;

    /// Checks the parameters, then builds the sequence with the checked parameter set
    fn build<D, T>(
        &self,
        x: &ArrayBase<D, Ix2>,
        y: &ArrayBase<T, Ix2>,
        psi: &Basis<F>,
    ) -> Result<BasisSequence<F>, Self::Error>
    where
        D: Data<Elem = F>,
        T: Data<Elem = F>,
    {
        let checked = self.check_ref()?;
        checked.build(x, y, psi)
    }
}

impl<F, P> FittingAlgorithm<F> for P
where
    F: Float,
    P: ParamGuard,
    P::Checked: FittingAlgorithm<F>,
    <P::Checked as FittingAlgorithm<F>>::Error: From<P::Error>,
{
    type Error = <P::Checked as FittingAlgorithm<F>>::Error;

    /// Checks the parameters, then runs the checked fitting algorithm
    fn run<D, T>(
        &self,
        x: &ArrayBase<D, Ix2>,
        y: &ArrayBase<T, Ix2>,
        basis: &Basis<F>,
    ) -> Result<F, Self::Error>
    where
        D: Data<Elem = F>,
        T: Data<Elem = F>,
    {
        let checked = self.check_ref()?;
        checked.run(x, y, basis)
    }
}
