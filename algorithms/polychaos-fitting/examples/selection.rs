use ndarray::{Array, Axis};
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand_xoshiro::Xoshiro256Plus;

use polychaos::Basis;
use polychaos_fitting::{CorrectedLeaveOneOut, FittingError, KFold, MetaModelSelection};
use polychaos_lars::Lars;

fn main() -> Result<(), FittingError> {
    env_logger::init();

    let mut rng = Xoshiro256Plus::seed_from_u64(42);
    let x = Array::random_using((100, 1), Uniform::new(-1., 1.), &mut rng);
    let noise = Array::random_using((100, 1), Uniform::new(-0.05, 0.05), &mut rng);
    let y = x.mapv(|v: f64| (2. * v).sin()) + noise;
    let psi = Basis::monomials(10);

    let kfold = MetaModelSelection::new(Lars::params(), KFold::new(5)?).select(&x, &y, &psi)?;
    println!(
        "k-fold: entry {} with functions {:?}, relative error {:.3e}",
        kfold.index(),
        kfold.indices(),
        kfold.relative_error()
    );
    println!("errors along the path: {:.3e}", kfold.errors());

    let loo =
        MetaModelSelection::new(Lars::params(), CorrectedLeaveOneOut).select(&x, &y, &psi)?;
    println!(
        "leave-one-out: entry {} with functions {:?}, relative error {:.3e}",
        loo.index(),
        loo.indices(),
        loo.relative_error()
    );

    let x_test = Array::linspace(-1., 1., 5).insert_axis(Axis(1));
    println!("predictions: {:.4}", loo.metamodel().evaluate(&x_test)?);
    println!("exact:       {:.4}", x_test.column(0).mapv(|v| (2. * v).sin()));

    Ok(())
}
