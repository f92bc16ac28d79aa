//! # Fitting algorithms
//!
//! `polychaos-fitting` scores a basis by the generalization error of its least squares fit,
//! and uses that score to select a metamodel along a basis sequence.
//!
//! * [`PenalizedLeastSquaresParams`] fits the coefficients of a basis, optionally weighted
//!   and with a Tikhonov penalty
//! * [`KFold`] estimates the relative prediction error by K-Fold cross-validation
//! * [`CorrectedLeaveOneOut`] estimates it with the analytical leave-one-out formula
//! * [`MetaModelSelection`] builds a basis sequence, for instance with least angle
//!   regression, and keeps the entry of smallest error
//!
//! Errors are relative: the mean squared prediction error is divided by the variance of the
//! outputs, so a value close to one means the metamodel does no better than the mean.

mod error;
mod kfold;
mod least_squares;
mod loo;
mod selection;

pub use error::{FittingError, Result};
pub use kfold::{Fold, KFold, KFoldParams};
pub use least_squares::{
    LeastSquaresApproximation, PenalizedLeastSquaresParams, PenalizedLeastSquaresValidParams,
};
pub use loo::CorrectedLeaveOneOut;
pub use selection::{MetaModelSelection, SelectedMetaModel};
