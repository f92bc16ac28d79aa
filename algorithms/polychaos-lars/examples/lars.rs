use ndarray::{Array, Axis};
use polychaos::{Basis, LinearCombination, ParamGuard};
use polychaos_lars::{Lars, LarsError};

fn main() -> Result<(), LarsError> {
    env_logger::init();

    // noiseless samples of exp(x) on [0, 2]
    let x = Array::linspace(0., 2., 25).insert_axis(Axis(1));
    let y = x.mapv(f64::exp);

    let model = Lars::params()
        .max_relative_convergence(1e-8)
        .check()?
        .path(&x, &y, &Basis::monomials(8))?;

    for (k, indices) in model.sequence().iter().enumerate() {
        println!("{:>2}: {:?}", k, indices);
    }
    println!("alphas: {}", model.alphas());
    println!("coefficients: {}", model.coefficients());

    let metamodel = LinearCombination::new(
        model.sequence().master_basis().clone(),
        model.coefficients().clone(),
    )?;
    let residual = &metamodel.evaluate(&x)? - &y.column(0);
    println!(
        "maximum residual: {}",
        residual.iter().fold(0.0f64, |m, r| m.max(r.abs()))
    );

    Ok(())
}
