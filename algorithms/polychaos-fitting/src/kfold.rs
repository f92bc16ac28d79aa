//! K-Fold cross-validation
//!
//! The leading `k * floor(size / k)` observations are split into `k` interleaved folds,
//! observation `j` belonging to fold `j mod k`. Each fold is held out once while the basis
//! is fitted on the others by least squares. The squared prediction errors on the held-out
//! observations are averaged and divided by the variance of the outputs.
//!
//! Interleaving spreads ordered or structured samples evenly over the folds. The trailing
//! `size mod k` observations take part in no fold.
use ndarray::{ArrayBase, Axis, Data, Ix2};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use polychaos::dataset::{check_basis_dimension, check_equal_size, output_variance, single_output};
use polychaos::{traits::FittingAlgorithm, Basis, Float, ParamGuard, Sample};

use crate::error::{FittingError, Result};
use crate::least_squares::PenalizedLeastSquaresParams;

/// Training and test observations of one fold
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fold {
    train: Vec<usize>,
    test: Vec<usize>,
}

impl Fold {
    /// Indices of the observations the basis is fitted on
    pub fn train(&self) -> &[usize] {
        &self.train
    }

    /// Indices of the held-out observations
    pub fn test(&self) -> &[usize] {
        &self.test
    }
}

/// K-Fold cross-validation, a [`FittingAlgorithm`]
///
/// # Example
///
/// ```rust
/// use polychaos::{prelude::*, Basis};
/// use polychaos_fitting::{FittingError, KFold};
/// use ndarray::Array;
///
/// let x = Array::linspace(0f64, 1., 20).insert_axis(ndarray::Axis(1));
/// let y = x.mapv(|v| 1. + v * v);
///
/// let error = KFold::params().k(5).run(&x, &y, &Basis::monomials(2))?;
/// assert!(error < 1e-10);
/// # Ok::<(), FittingError>(())
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KFold {
    k: usize,
}

impl Default for KFold {
    fn default() -> Self {
        KFold { k: 10 }
    }
}

impl KFold {
    /// Create a validator with `k` folds
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFoldCount`](FittingError::InvalidFoldCount) if `k` is zero.
    pub fn new(k: usize) -> Result<Self> {
        let mut kfold = KFold::default();
        kfold.set_k(k)?;
        Ok(kfold)
    }

    /// Create default K-Fold parameters, with `k = 10`
    pub fn params() -> KFoldParams {
        KFoldParams::new()
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Change the number of folds, failing immediately if `k` is zero
    pub fn set_k(&mut self, k: usize) -> Result<()> {
        if k < 1 {
            return Err(FittingError::InvalidFoldCount(k));
        }
        self.k = k;

        Ok(())
    }

    /// Split the observations of a sample of `size` observations into `k` folds
    ///
    /// The test sets partition `0..k * floor(size / k)`, fold `i` holding the indices
    /// congruent to `i` modulo `k`.
    pub fn partition(&self, size: usize) -> Vec<Fold> {
        let k = self.k;
        let used = size / k * k;

        (0..k)
            .map(|i| {
                let (test, train) = (0..used).partition(|j| j % k == i);
                Fold { train, test }
            })
            .collect()
    }
}

impl<F: Float> FittingAlgorithm<F> for KFold {
    type Error = FittingError;

    /// Estimate the relative prediction error of a least squares fit on `basis`
    ///
    /// # Errors
    ///
    /// * `InvalidArgument` if `y` is not unidimensional, sizes differ or the dimension of
    ///   `x` does not match the basis
    /// * [`TooManyFolds`](FittingError::TooManyFolds) if `k >= size`
    /// * [`NullVariance`](FittingError::NullVariance) for constant outputs
    /// * any least squares failure in a fold
    fn run<D, T>(&self, x: &ArrayBase<D, Ix2>, y: &ArrayBase<T, Ix2>, basis: &Basis<F>) -> Result<F>
    where
        D: Data<Elem = F>,
        T: Data<Elem = F>,
    {
        let targets = single_output(y)?;
        check_equal_size(x, y)?;
        check_basis_dimension(x, basis)?;

        let size = x.size();
        if self.k >= size {
            return Err(FittingError::TooManyFolds { k: self.k, size });
        }
        let variance = output_variance(targets);
        if variance.is_nan() || variance <= F::zero() {
            return Err(FittingError::NullVariance);
        }

        let least_squares = PenalizedLeastSquaresParams::<F>::new().check()?;

        let mut quadratic_residual = F::zero();
        for (i, fold) in self.partition(size).iter().enumerate() {
            let x_train = x.select(Axis(0), fold.train());
            let y_train = y.select(Axis(0), fold.train());
            let approximation = least_squares.fit(&x_train, &y_train, basis)?;

            let x_test = x.select(Axis(0), fold.test());
            let predictions = approximation.metamodel().evaluate(&x_test)?;
            let fold_residual = fold
                .test()
                .iter()
                .zip(predictions.iter())
                .map(|(&j, &prediction)| {
                    let r = targets[j] - prediction;
                    r * r
                })
                .sum::<F>();

            log::debug!(
                "fold {} over {}: train size={} test size={} quadratic residual={}",
                i + 1,
                self.k,
                fold.train().len(),
                fold.test().len(),
                fold_residual
            );
            quadratic_residual += fold_residual;
        }

        let test_size = size / self.k;
        let empirical_error = quadratic_residual / F::cast(test_size * self.k);
        let relative_error = empirical_error / variance;

        log::info!(
            "k-fold error with k={}: empirical={} relative={}",
            self.k,
            empirical_error,
            relative_error
        );

        Ok(relative_error)
    }
}

/// Unchecked K-Fold parameters
///
/// # Parameters
/// | Name | Default | Purpose | Range |
/// | :--- | :--- | :---| :--- |
/// | [k](Self::k) | `10` | Number of folds | `[1, size)` |
///
/// The upper bound depends on the sample and is checked by `run`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KFoldParams(KFold);

impl Default for KFoldParams {
    fn default() -> Self {
        Self::new()
    }
}

impl KFoldParams {
    pub fn new() -> Self {
        Self(KFold::default())
    }

    /// Set the number of folds
    ///
    /// Defaults to `10` if not set
    pub fn k(mut self, k: usize) -> Self {
        self.0.k = k;
        self
    }
}

impl ParamGuard for KFoldParams {
    type Checked = KFold;
    type Error = FittingError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.k < 1 {
            Err(FittingError::InvalidFoldCount(self.0.k))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
