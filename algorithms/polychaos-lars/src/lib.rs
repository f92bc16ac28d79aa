//! # Least angle regression a.k.a. LAR
//!
//! Least angle regression builds a nested sequence of sub-bases of a master basis. It
//! starts from an empty model and, at each step, adds the basis function most correlated
//! with the current residual. The coefficients of the active functions then move along the
//! direction equiangular between them, until some inactive function is as correlated with
//! the residual as the active ones. That function joins the active set at the next step.
//!
//! Every iteration appends the complete active set to the resulting [`BasisSequence`], so
//! the sequence describes a path of models with 1, 2, ... predictors. Choosing where to
//! truncate the path is left to the caller, typically by cross-validation with
//! `polychaos-fitting`.
//!
//! The square root of the Gram matrix of the active columns is updated in place at each
//! step, see [`cholesky`].
//!
//! ## References
//!
//! * ["Least Angle Regression", Efron et al.](https://web.stanford.edu/~hastie/Papers/LARS/LeastAngle_2002.pdf)
//! * [Wikipedia entry on the Least-angle regression](https://en.wikipedia.org/wiki/Least-angle_regression)

use ndarray::{Array1, Array2};
use polychaos::{BasisSequence, Float};

pub use error::{LarsError, Result};
pub use hyperparams::{LarsParams, LarsValidParams};

mod algorithm;
pub mod cholesky;
mod error;
mod hyperparams;

/// A least angle regression path
///
/// Obtained with [`LarsValidParams::path`]. The basis sequence alone is returned by
/// [`BasisSequenceFactory::build`](polychaos::traits::BasisSequenceFactory::build).
#[derive(Debug, Clone)]
pub struct Lars<F> {
    sequence: BasisSequence<F>,
    coefficients: Array1<F>,
    coef_path: Array2<F>,
    alphas: Array1<F>,
    n_iter: usize,
    active: Vec<usize>,
}

impl<F: Float> Lars<F> {
    /// Create default least angle regression parameters
    pub fn params() -> LarsParams<F> {
        LarsParams::new()
    }

    /// The nested active sets, one entry per iteration
    pub fn sequence(&self) -> &BasisSequence<F> {
        &self.sequence
    }

    pub fn into_sequence(self) -> BasisSequence<F> {
        self.sequence
    }

    /// Coefficients over the master basis at the end of the path
    pub fn coefficients(&self) -> &Array1<F> {
        &self.coefficients
    }

    /// Coefficients after every iteration, shape `(basis_size, n_iter)`
    pub fn coef_path(&self) -> &Array2<F> {
        &self.coef_path
    }

    /// Absolute correlation of the predictor selected at each iteration
    pub fn alphas(&self) -> &Array1<F> {
        &self.alphas
    }

    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Indices of active predictors at the end of the path, in order of entry
    pub fn active(&self) -> &[usize] {
        &self.active
    }
}
