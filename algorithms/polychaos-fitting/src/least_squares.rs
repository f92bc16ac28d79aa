//! Penalized least squares
//!
//! Fits the coefficients `a` of a basis by minimising
//!
//! ```text
//! Σ_i w_i (y_i - Σ_j a_j ψ_j(x_i))² + λ ||a||²
//! ```
//!
//! Without penalty the weighted design matrix is solved with a QR decomposition, otherwise
//! the regularised normal equations `(ΨᵀWΨ + λI) a = ΨᵀWy` are solved with a Cholesky
//! factorization.
use linfa_linalg::cholesky::Cholesky;
use linfa_linalg::qr::LeastSquaresQrInto;
use linfa_linalg::triangular::{SolveTriangularInplace, UPLO};
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Axis, Data, Ix2};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use polychaos::dataset::{check_basis_dimension, check_equal_size, single_output};
use polychaos::{Basis, Float, LinearCombination, ParamGuard, Sample};

use crate::error::{FittingError, Result};

/// A verified parameter set for penalized least squares
///
/// See [`PenalizedLeastSquaresParams`] for more information.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct PenalizedLeastSquaresValidParams<F> {
    penalty: F,
}

/// A parameter set for penalized least squares
///
/// # Parameters
/// | Name | Default | Purpose | Range |
/// | :--- | :--- | :---| :--- |
/// | [penalty](Self::penalty) | `0` | Weight of the squared L2 norm of the coefficients | `[0, inf)` |
///
/// # Errors
///
/// Returns [`InvalidPenalty`](FittingError::InvalidPenalty) if the penalty is negative or
/// not finite.
///
/// # Example
///
/// ```rust
/// use polychaos::{Basis, ParamGuard};
/// use polychaos_fitting::{FittingError, LeastSquaresApproximation};
/// use ndarray::array;
///
/// let x = array![[0f64], [1.], [2.], [3.]];
/// let y = array![[1.], [3.], [5.], [7.]];
///
/// let approximation = LeastSquaresApproximation::params()
///     .check()?
///     .fit(&x, &y, &Basis::monomials(1))?;
///
/// assert!((approximation.coefficients()[1] - 2.0).abs() < 1e-10);
/// # Ok::<(), FittingError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PenalizedLeastSquaresParams<F>(PenalizedLeastSquaresValidParams<F>);

impl<F: Float> Default for PenalizedLeastSquaresParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> PenalizedLeastSquaresParams<F> {
    /// Create default parameters, without penalty
    pub fn new() -> Self {
        Self(PenalizedLeastSquaresValidParams {
            penalty: F::zero(),
        })
    }

    /// Set the Tikhonov penalty `λ`
    ///
    /// Defaults to `0` if not set
    pub fn penalty(mut self, penalty: F) -> Self {
        self.0.penalty = penalty;
        self
    }
}

impl<F: Float> ParamGuard for PenalizedLeastSquaresParams<F> {
    type Checked = PenalizedLeastSquaresValidParams<F>;
    type Error = FittingError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        let penalty = self.0.penalty;
        if !penalty.is_finite() || penalty < F::zero() {
            Err(FittingError::InvalidPenalty(
                penalty.to_f32().unwrap_or(f32::NAN),
            ))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float> PenalizedLeastSquaresValidParams<F> {
    pub fn penalty(&self) -> F {
        self.penalty
    }

    /// Fit the coefficients of `basis` with unit weights
    pub fn fit<D, T>(
        &self,
        x: &ArrayBase<D, Ix2>,
        y: &ArrayBase<T, Ix2>,
        basis: &Basis<F>,
    ) -> Result<LeastSquaresApproximation<F>>
    where
        D: Data<Elem = F>,
        T: Data<Elem = F>,
    {
        let weights = Array1::ones(x.size());
        self.fit_weighted(x, y, weights.view(), basis)
    }

    /// Fit the coefficients of `basis`, observation `i` weighing `weights[i]`
    ///
    /// # Errors
    ///
    /// * `InvalidArgument` on mismatched sample sizes or dimensions
    /// * [`InvalidWeights`](FittingError::InvalidWeights) unless there is one positive
    ///   weight per observation
    /// * [`NotEnoughSamples`](FittingError::NotEnoughSamples) without penalty and with less
    ///   observations than basis functions
    /// * [`IllConditioned`](FittingError::IllConditioned) when the solution is not finite
    pub fn fit_weighted<D, T>(
        &self,
        x: &ArrayBase<D, Ix2>,
        y: &ArrayBase<T, Ix2>,
        weights: ArrayView1<'_, F>,
        basis: &Basis<F>,
    ) -> Result<LeastSquaresApproximation<F>>
    where
        D: Data<Elem = F>,
        T: Data<Elem = F>,
    {
        let targets = single_output(y)?;
        check_equal_size(x, y)?;
        check_basis_dimension(x, basis)?;

        if weights.len() != x.size() {
            return Err(FittingError::InvalidWeights(format!(
                "expected {} weights, got {}",
                x.size(),
                weights.len()
            )));
        }
        if weights.iter().any(|w| !w.is_finite() || *w <= F::zero()) {
            return Err(FittingError::InvalidWeights(
                "weights should be positive".to_string(),
            ));
        }

        let design = basis.design_matrix(x)?;
        let coefficients = self.solve(design.view(), targets, weights)?;

        let residuals = &targets - &design.dot(&coefficients);
        let residual = residuals
            .iter()
            .zip(weights.iter())
            .map(|(&r, &w)| w * r * r)
            .sum::<F>()
            .sqrt()
            / F::cast(x.size());

        Ok(LeastSquaresApproximation {
            metamodel: LinearCombination::new(basis.clone(), coefficients)?,
            residual,
        })
    }

    fn solve(
        &self,
        design: ArrayView2<'_, F>,
        y: ArrayView1<'_, F>,
        weights: ArrayView1<'_, F>,
    ) -> Result<Array1<F>> {
        let (size, basis_size) = design.dim();
        if basis_size == 0 {
            return Ok(Array1::zeros(0));
        }

        let sqrt_weights = weights.mapv(F::sqrt);
        let weighted_design = &design * &sqrt_weights.view().insert_axis(Axis(1));
        let weighted_y = &y * &sqrt_weights;

        let coefficients = if self.penalty > F::zero() {
            let mut gram = weighted_design.t().dot(&weighted_design);
            for i in 0..basis_size {
                gram[[i, i]] += self.penalty;
            }
            cholesky_solve(&gram, weighted_design.t().dot(&weighted_y))?
        } else {
            if size < basis_size {
                return Err(FittingError::NotEnoughSamples { size, basis_size });
            }
            solve_least_squares(weighted_design, weighted_y)?
        };

        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(FittingError::IllConditioned);
        }

        Ok(coefficients)
    }
}

/// Find the `a` minimising the 2-norm of `design a - y`
fn solve_least_squares<F: Float>(mut design: Array2<F>, mut y: Array1<F>) -> Result<Array1<F>> {
    let (design, y) = (design.view_mut(), y.view_mut());

    let out = design
        .least_squares_into(y.insert_axis(Axis(1)))?
        .remove_axis(Axis(1));

    Ok(out)
}

/// Solve `A x = rhs` for a symmetric positive definite `A`
fn cholesky_solve<F: Float>(a: &Array2<F>, rhs: Array1<F>) -> Result<Array1<F>> {
    let lower = a.cholesky()?;
    let mut x = rhs.insert_axis(Axis(1));
    lower.solve_triangular_inplace(&mut x, UPLO::Lower)?;
    lower.t().solve_triangular_inplace(&mut x, UPLO::Upper)?;

    Ok(x.remove_axis(Axis(1)))
}

/// Least squares coefficients of a basis, along with the weighted residual
#[derive(Clone, Debug)]
pub struct LeastSquaresApproximation<F> {
    metamodel: LinearCombination<F>,
    residual: F,
}

impl<F: Float> LeastSquaresApproximation<F> {
    /// Create default penalized least squares parameters
    pub fn params() -> PenalizedLeastSquaresParams<F> {
        PenalizedLeastSquaresParams::new()
    }

    pub fn coefficients(&self) -> &Array1<F> {
        self.metamodel.coefficients()
    }

    /// The fitted linear combination of basis functions
    pub fn metamodel(&self) -> &LinearCombination<F> {
        &self.metamodel
    }

    pub fn into_metamodel(self) -> LinearCombination<F> {
        self.metamodel
    }

    /// `sqrt(Σ w_i r_i²) / size`
    pub fn residual(&self) -> F {
        self.residual
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array};
    use ndarray_rand::rand::SeedableRng;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;
    use rand_xoshiro::Xoshiro256Plus;

    fn params() -> PenalizedLeastSquaresValidParams<f64> {
        LeastSquaresApproximation::params().check().unwrap()
    }

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<PenalizedLeastSquaresParams<f64>>();
        has_autotraits::<PenalizedLeastSquaresValidParams<f64>>();
        has_autotraits::<LeastSquaresApproximation<f64>>();
        has_autotraits::<FittingError>();
    }

    #[test]
    fn fits_line_through_two_dots() {
        let x = array![[0.], [1.]];
        let y = array![[1.], [2.]];

        let approximation = params().fit(&x, &y, &Basis::monomials(1)).unwrap();

        assert_abs_diff_eq!(approximation.coefficients(), &array![1., 1.], epsilon = 1e-12);
        assert_abs_diff_eq!(approximation.residual(), 0., epsilon = 1e-12);
    }

    #[test]
    fn fits_least_squares_line_through_three_dots() {
        let x = array![[0.], [1.], [2.]];
        let y = array![[0.], [0.], [2.]];

        let approximation = params().fit(&x, &y, &Basis::monomials(1)).unwrap();

        assert_abs_diff_eq!(
            approximation.coefficients(),
            &array![-1. / 3., 1.],
            epsilon = 1e-12
        );
        // residuals are 1/3, -2/3, 1/3
        assert_abs_diff_eq!(
            approximation.residual(),
            (6.0f64 / 9.).sqrt() / 3.,
            epsilon = 1e-12
        );
    }

    #[test]
    fn recovers_polynomial_coefficients() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let x = Array::random_using((50, 1), Uniform::new(-1., 1.), &mut rng);
        let y = x.mapv(|v: f64| 1. - 2. * v + 0.5 * v * v * v);

        let approximation = params().fit(&x, &y, &Basis::monomials(3)).unwrap();

        assert_abs_diff_eq!(
            approximation.coefficients(),
            &array![1., -2., 0., 0.5],
            epsilon = 1e-10
        );
        let predictions = approximation.metamodel().evaluate(&x).unwrap();
        assert_abs_diff_eq!(predictions, y.column(0), epsilon = 1e-10);
    }

    #[test]
    fn weights_favour_heavy_observations() {
        let x = array![[0.], [0.], [0.]];
        let y = array![[0.], [0.], [3.]];
        let weights = array![1., 1., 4.];

        let approximation = params()
            .fit_weighted(&x, &y, weights.view(), &Basis::monomials(0))
            .unwrap();

        // weighted mean
        assert_abs_diff_eq!(approximation.coefficients()[0], 2., epsilon = 1e-12);
    }

    #[test]
    fn penalty_shrinks_coefficients() {
        let x = array![[0.], [1.], [2.], [3.]];
        let y = array![[1.], [3.], [5.], [7.]];
        let basis = Basis::monomials(1);

        let unpenalized = params().fit(&x, &y, &basis).unwrap();
        let penalized = LeastSquaresApproximation::params()
            .penalty(10.)
            .check()
            .unwrap()
            .fit(&x, &y, &basis)
            .unwrap();

        let norm = |a: &Array1<f64>| a.dot(a);
        assert!(norm(penalized.coefficients()) < norm(unpenalized.coefficients()));

        // (ΨᵀΨ + λI) a = Ψᵀy
        let design = basis.design_matrix(&x).unwrap();
        let mut lhs = design.t().dot(&design);
        lhs[[0, 0]] += 10.;
        lhs[[1, 1]] += 10.;
        assert_abs_diff_eq!(
            lhs.dot(penalized.coefficients()),
            design.t().dot(&y.column(0)),
            epsilon = 1e-10
        );
    }

    #[test]
    fn penalty_allows_underdetermined_fits() {
        let x = array![[1.]];
        let y = array![[2.]];

        assert!(matches!(
            params().fit(&x, &y, &Basis::monomials(2)),
            Err(FittingError::NotEnoughSamples {
                size: 1,
                basis_size: 3
            })
        ));

        let approximation = LeastSquaresApproximation::params()
            .penalty(1e-3)
            .check()
            .unwrap()
            .fit(&x, &y, &Basis::monomials(2))
            .unwrap();
        assert!(approximation.coefficients().iter().all(|c| c.is_finite()));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(matches!(
            LeastSquaresApproximation::params().penalty(-1.).check(),
            Err(FittingError::InvalidPenalty(_))
        ));

        let x = array![[0.], [1.], [2.]];
        let y = array![[0.], [1.], [2.]];
        let basis = Basis::monomials(1);

        assert!(matches!(
            params().fit_weighted(&x, &y, array![1., 1.].view(), &basis),
            Err(FittingError::InvalidWeights(_))
        ));
        assert!(matches!(
            params().fit_weighted(&x, &y, array![1., 0., 1.].view(), &basis),
            Err(FittingError::InvalidWeights(_))
        ));
        assert!(matches!(
            params().fit(&x, &y, &Basis::linear(2)),
            Err(FittingError::BaseCrate(_))
        ));
        assert!(params().fit(&x, &array![[0.], [1.]], &basis).is_err());
    }

    #[test]
    fn cholesky_solve_inverts_spd_system() {
        let a = array![[4., 1.], [1., 3.]];
        let x = cholesky_solve(&a, array![1., 2.]).unwrap();
        assert_abs_diff_eq!(a.dot(&x), array![1., 2.], epsilon = 1e-12);
    }
}
