use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Axis, Data, Ix2};

use polychaos::{
    dataset::{check_basis_dimension, check_equal_size, single_output},
    traits::BasisSequenceFactory,
    Basis, BasisSequence, Error, Float, Sample,
};

use crate::{
    cholesky,
    error::{LarsError, Result},
    Lars, LarsValidParams,
};

impl<F: Float> BasisSequenceFactory<F> for LarsValidParams<F> {
    type Error = LarsError;

    /// Build the least angle regression sequence of sub-bases of `psi`
    ///
    /// The input sample `x` must have shape `(n_samples, psi.dimension())`
    /// The output sample `y` must have shape `(n_samples, 1)`
    fn build<D, T>(
        &self,
        x: &ArrayBase<D, Ix2>,
        y: &ArrayBase<T, Ix2>,
        psi: &Basis<F>,
    ) -> Result<BasisSequence<F>>
    where
        D: Data<Elem = F>,
        T: Data<Elem = F>,
    {
        self.path(x, y, psi).map(Lars::into_sequence)
    }
}

impl<F: Float> LarsValidParams<F> {
    /// Compute the least angle regression path of `y` over the basis `psi`
    ///
    /// Returns a [`Lars`] object holding the basis sequence along with the coefficients
    /// after every iteration.
    ///
    /// # Errors
    ///
    /// Returns `polychaos::Error::InvalidArgument` (wrapped in [`LarsError::BaseCrate`]) if
    /// `x` is empty, `y` is not unidimensional, the sample sizes differ or the dimension of
    /// `x` does not match the one of `psi`. Numerical failures while extending the Cholesky
    /// factor are propagated as well.
    pub fn path<D, T>(
        &self,
        x: &ArrayBase<D, Ix2>,
        y: &ArrayBase<T, Ix2>,
        psi: &Basis<F>,
    ) -> Result<Lars<F>>
    where
        D: Data<Elem = F>,
        T: Data<Elem = F>,
    {
        if x.size() == 0 {
            return Err(Error::InvalidArgument("input sample cannot be empty".to_string()).into());
        }
        let targets = single_output(y)?;
        check_equal_size(x, y)?;
        check_basis_dimension(x, psi)?;

        let design = psi.design_matrix(x)?;

        lar_path(
            design.view(),
            targets,
            self.max_relative_convergence(),
            psi.clone(),
        )
    }
}

/// Compute the least angle regression path on the design matrix `psi_x`
///
/// At most `min(basis_size, n_samples - 1)` iterations are run. The loop stops earlier
/// once the L1 norm of the coefficients changes by a relative amount of at most
/// `max_relative_convergence`; an iteration leaving all coefficients at zero never stops
/// the loop. A null target therefore yields `min(basis_size, n_samples - 1)` entries with
/// null coefficients instead of a single one.
fn lar_path<F: Float>(
    psi_x: ArrayView2<'_, F>,
    y: ArrayView1<'_, F>,
    max_relative_convergence: F,
    master: Basis<F>,
) -> Result<Lars<F>> {
    let (n_samples, basis_size) = psi_x.dim();
    let max_iter = basis_size.min(n_samples.saturating_sub(1));

    let mut sequence = BasisSequence::new(master);
    let mut coefficients = Array1::<F>::zeros(basis_size);
    let mut mu = Array1::<F>::zeros(n_samples);

    let mut predictors: Vec<usize> = Vec::with_capacity(max_iter);
    let mut is_active = vec![false; basis_size];
    let mut factor: Option<Array2<F>> = None;

    let mut coef_path = Vec::with_capacity(max_iter);
    let mut alphas = Vec::with_capacity(max_iter);
    let mut l1_norm = F::zero();
    let mut n_iter = 0;

    while n_iter < max_iter {
        let c = psi_x.t().dot(&(&y - &mu));

        // first inactive column of maximal absolute correlation
        let mut candidate = None;
        let mut c_max = -F::one();
        for (j, cj) in c.iter().enumerate() {
            if !is_active[j] && cj.abs() > c_max {
                c_max = cj.abs();
                candidate = Some(j);
            }
        }
        let candidate = candidate.ok_or(LarsError::NonFiniteCorrelation)?;
        log::debug!("predictor={} residual={}", candidate, c_max);

        let previous = psi_x.select(Axis(1), &predictors);
        let r = cholesky::extend(
            factor.as_ref(),
            psi_x.column(candidate),
            previous.view(),
            candidate,
        )?;

        predictors.push(candidate);
        is_active[candidate] = true;
        let inactive: Vec<usize> = (0..basis_size).filter(|&j| !is_active[j]).collect();

        let signs = correlation_signs(c.view(), &predictors);

        let ga1 = cholesky::solve_normal(&r, signs.view())?;
        let c_norm = F::one() / signs.dot(&ga1).sqrt();
        let direction = ga1 * c_norm;

        let u = psi_x.select(Axis(1), &predictors).dot(&direction);
        let d = psi_x.select(Axis(1), &inactive).t().dot(&u);
        let c_inactive = c.select(Axis(0), &inactive);

        let step = equicorrelation_step(c_max, c_norm, c_inactive.view(), d.view());

        mu.scaled_add(step, &u);

        let previous_l1_norm = l1_norm;
        l1_norm = F::zero();
        for (&j, &dj) in predictors.iter().zip(direction.iter()) {
            coefficients[j] += step * dj;
            l1_norm += coefficients[j].abs();
        }
        let relative_convergence = if l1_norm > F::zero() {
            Some((F::one() - previous_l1_norm / l1_norm).abs())
        } else {
            None
        };

        sequence.push(predictors.clone())?;
        coef_path.push(coefficients.clone());
        alphas.push(c_max);
        factor = Some(r);
        n_iter += 1;

        log::debug!(
            "end of iteration {} over {}, step={}, relative convergence={:?} for a target={}",
            n_iter,
            max_iter,
            step,
            relative_convergence,
            max_relative_convergence
        );

        if let Some(relative_convergence) = relative_convergence {
            if relative_convergence.is_nan() || relative_convergence <= max_relative_convergence
            {
                break;
            }
        }
    }

    let coef_path = Array2::from_shape_fn((basis_size, n_iter), |(i, k)| coef_path[k][i]);

    Ok(Lars {
        sequence,
        coefficients,
        coef_path,
        alphas: Array1::from(alphas),
        n_iter,
        active: predictors,
    })
}

/// Signs of the correlations of the active predictors, a null correlation counting as positive
fn correlation_signs<F: Float>(c: ArrayView1<'_, F>, predictors: &[usize]) -> Array1<F> {
    predictors
        .iter()
        .map(|&j| if c[j] < F::zero() { -F::one() } else { F::one() })
        .collect()
}

/// Largest move along the equiangular direction before an inactive predictor catches up
///
/// Starts from `c_max / c_norm`, the step reaching the least squares fit on the active
/// set, and shrinks it to every positive candidate `(c_max ∓ c_j) / (c_norm ∓ d_j)`.
fn equicorrelation_step<F: Float>(
    c_max: F,
    c_norm: F,
    c_inactive: ArrayView1<'_, F>,
    d: ArrayView1<'_, F>,
) -> F {
    c_inactive
        .iter()
        .zip(d.iter())
        .fold(c_max / c_norm, |step, (&cj, &dj)| {
            let lhs = (c_max - cj) / (c_norm - dj);
            let rhs = (c_max + cj) / (c_norm + dj);
            [lhs, rhs]
                .iter()
                .filter(|&&gamma| gamma > F::zero())
                .fold(step, |step, &gamma| step.min(gamma))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lars, LarsError, LarsParams, LarsValidParams};

    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array, Array2};
    use ndarray_rand::rand::SeedableRng;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;
    use polychaos::{BasisFunction, ParamGuard};
    use rand_xoshiro::Xoshiro256Plus;

    /// Basis picking one column of the input sample per function
    fn columns(dimension: usize) -> Basis<f64> {
        (0..dimension).fold(Basis::new(dimension), |basis, j| {
            basis
                .with(BasisFunction::new(dimension, move |x: ArrayView1<f64>| x[j]))
                .unwrap()
        })
    }

    fn params() -> LarsValidParams<f64> {
        Lars::params().check().unwrap()
    }

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<Lars<f64>>();
        has_autotraits::<LarsParams<f64>>();
        has_autotraits::<LarsValidParams<f64>>();
        has_autotraits::<LarsError>();
    }

    #[test]
    fn quadratic_target_selects_quadratic_term_first() {
        let _ = env_logger::builder().is_test(true).try_init();
        let x = array![[1.], [2.], [3.], [4.], [5.], [6.]];
        let y = x.mapv(|v: f64| v * v);

        let sequence = params().build(&x, &y, &Basis::monomials(2)).unwrap();

        assert!(!sequence.is_empty());
        assert!(sequence.len() <= 3);
        assert_eq!(sequence.indices(0), &[2]);
    }

    #[test]
    fn toy_example_reaches_least_squares_solution() {
        let x = array![[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]];
        let y = array![[3.0], [2.0], [0.0]];

        let model = params().path(&x, &y, &columns(2)).unwrap();

        assert_eq!(model.n_iter(), 2);
        assert_eq!(model.active(), &[0, 1]);
        assert_abs_diff_eq!(model.alphas(), &array![3.0, 2.0], epsilon = 1e-12);
        assert_abs_diff_eq!(
            model.coef_path(),
            &array![[1.0, 3.0], [0.0, 2.0]],
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(model.coefficients(), &array![3.0, 2.0], epsilon = 1e-12);
    }

    #[test]
    fn active_sets_are_nested_and_bounded() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let x = Array::random_using((40, 8), Uniform::new(-1., 1.), &mut rng);
        let y = Array::random_using((40, 1), Uniform::new(-1., 1.), &mut rng);

        let sequence = Lars::params()
            .max_relative_convergence(0.0)
            .build(&x, &y, &columns(8))
            .unwrap();

        assert!(sequence.len() <= 8);
        for k in 0..sequence.len() {
            assert_eq!(sequence.indices(k).len(), k + 1);
            if k > 0 {
                assert_eq!(&sequence.indices(k)[..k], sequence.indices(k - 1));
            }
        }
    }

    #[test]
    fn iterations_are_bounded_by_sample_size() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1);
        let x = Array::random_using((4, 6), Uniform::new(-1., 1.), &mut rng);
        let y = Array::random_using((4, 1), Uniform::new(-1., 1.), &mut rng);

        let model = Lars::params()
            .max_relative_convergence(0.0)
            .check()
            .unwrap()
            .path(&x, &y, &columns(6))
            .unwrap();

        assert!(model.n_iter() <= 3);
        assert_eq!(model.sequence().len(), model.n_iter());
        assert_eq!(model.coef_path().dim(), (6, model.n_iter()));
    }

    #[test]
    fn active_correlations_stay_tied() {
        // after each step the next predictor is exactly as correlated with the residual
        // as the active ones
        let mut rng = Xoshiro256Plus::seed_from_u64(2);
        let x = Array::random_using((30, 5), Uniform::new(-1., 1.), &mut rng);
        let y = Array::random_using((30, 1), Uniform::new(-1., 1.), &mut rng);

        let model = Lars::params()
            .max_relative_convergence(0.0)
            .check()
            .unwrap()
            .path(&x, &y, &columns(5))
            .unwrap();
        assert_eq!(model.n_iter(), 5);

        let targets = y.column(0);
        for k in 0..model.n_iter() - 1 {
            let residual = &targets - &x.dot(&model.coef_path().column(k));
            let c = x.t().dot(&residual);
            let c_max = c.iter().fold(0.0f64, |m, v| m.max(v.abs()));
            for &j in model.sequence().indices(k + 1) {
                assert_abs_diff_eq!(c[j].abs(), c_max, epsilon = 1e-8);
            }
        }

        // the last step lands on the least squares solution
        let residual = &targets - &x.dot(model.coefficients());
        assert_abs_diff_eq!(x.t().dot(&residual), Array1::<f64>::zeros(5), epsilon = 1e-8);
    }

    #[test]
    fn null_target_gives_null_path() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let x = Array::random_using((10, 5), Uniform::new(1., 2.), &mut rng);
        let y = Array2::zeros((10, 1));

        let model = params().path(&x, &y, &columns(5)).unwrap();

        assert_eq!(model.n_iter(), 5);
        assert_abs_diff_eq!(model.coef_path(), &Array2::<f64>::zeros((5, 5)));
    }

    #[test]
    fn ties_select_lowest_index() {
        let basis = Basis::new(1)
            .with(BasisFunction::constant(1))
            .and_then(|b| b.with(BasisFunction::constant(1)))
            .and_then(|b| b.with(BasisFunction::new(1, |x: ArrayView1<f64>| x[0])))
            .unwrap();
        let x = array![[1.0], [-1.0]];
        let y = array![[1.0], [1.0]];

        let sequence = params().build(&x, &y, &basis).unwrap();

        assert_eq!(sequence.len(), 1);
        assert_eq!(sequence.indices(0), &[0]);
    }

    #[test]
    fn collinear_predictor_is_an_error() {
        let basis = Basis::new(1)
            .with(BasisFunction::constant(1))
            .and_then(|b| b.with(BasisFunction::constant(1)))
            .unwrap();
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = x.clone();

        let err = params().build(&x, &y, &basis).unwrap_err();
        assert!(matches!(err, LarsError::CollinearPredictor { index: 1, .. }));
    }

    #[test]
    fn invalid_samples_are_rejected() {
        let basis = Basis::<f64>::monomials(2);

        let empty = Array2::<f64>::zeros((0, 1));
        assert!(matches!(
            params().build(&empty, &empty, &basis),
            Err(LarsError::BaseCrate(Error::InvalidArgument(_)))
        ));

        let x = array![[1.0], [2.0], [3.0]];
        let y = array![[1.0, 0.0], [2.0, 0.0], [3.0, 0.0]];
        assert!(params().build(&x, &y, &basis).is_err());

        let y = array![[1.0], [2.0]];
        assert!(params().build(&x, &y, &basis).is_err());

        let y = array![[1.0], [2.0], [3.0]];
        assert!(params().build(&x, &y, &Basis::linear(2)).is_err());
    }

    #[test]
    fn invalid_convergence_is_rejected() {
        assert!(matches!(
            Lars::params().max_relative_convergence(-1.0).check(),
            Err(LarsError::InvalidConvergence(_))
        ));
        assert!(Lars::<f64>::params()
            .max_relative_convergence(f64::NAN)
            .check()
            .is_err());

        let x = array![[1.0], [2.0], [3.0]];
        assert!(Lars::params()
            .max_relative_convergence(-1.0)
            .build(&x, &x, &Basis::monomials(1))
            .is_err());
    }

    #[test]
    fn equicorrelation_step_takes_smallest_positive_candidate() {
        let c_inactive = array![1.0, -3.0];
        let d = array![0.5, 0.0];
        let step = equicorrelation_step(4.0, 2.0, c_inactive.view(), d.view());
        // lhs = 3 / 1.5 = 2, rhs = 5 / 2.5 = 2, then lhs = 7 / 2, rhs = 1 / 2
        assert_abs_diff_eq!(step, 0.5);

        let empty = Array1::<f64>::zeros(0);
        let step = equicorrelation_step(4.0, 2.0, empty.view(), empty.view());
        assert_abs_diff_eq!(step, 2.0);
    }

    #[test]
    fn null_correlation_counts_as_positive_sign() {
        let c = array![0.0f64, -2.0, 3.0, -0.0];

        let signs = correlation_signs(c.view(), &[0, 1, 2, 3]);
        assert_eq!(signs, array![1.0, -1.0, 1.0, 1.0]);

        let signs = correlation_signs(c.view(), &[1, 0]);
        assert_eq!(signs, array![-1.0, 1.0]);
    }
}
