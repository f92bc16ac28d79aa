//! `polychaos` provides the building blocks of sparse functional metamodels in Rust.
//!
//! A metamodel approximates an expensive model `y = f(x)` by a linear combination of
//! basis functions `ψ_j`. Choosing *which* basis functions to keep is the hard part, and
//! this crate provides the shared vocabulary used by the algorithm crates of the
//! workspace to do so:
//!
//! * [`Basis`] and [`BasisFunction`]: candidate regressors and the design matrix `Ψ`
//! * [`BasisSequence`]: a nested path of active index sets over a master basis
//! * [`LinearCombination`]: the metamodel obtained once coefficients are known
//! * [`traits::BasisSequenceFactory`] and [`traits::FittingAlgorithm`]: the seams between
//!   path builders (e.g. least angle regression in `polychaos-lars`) and error estimators
//!   (e.g. k-fold cross-validation in `polychaos-fitting`)
//!
//! Samples are plain `ndarray` matrices with one observation per row.
//!
//! ## Example
//!
//! ```rust
//! use polychaos::Basis;
//! use ndarray::array;
//!
//! let basis = Basis::<f64>::monomials(2);
//! let psi = basis.design_matrix(&array![[1.0], [2.0], [3.0]])?;
//!
//! assert_eq!(psi, array![[1.0, 1.0, 1.0], [1.0, 2.0, 4.0], [1.0, 3.0, 9.0]]);
//! # Ok::<(), polychaos::Error>(())
//! ```

pub mod basis;
pub mod dataset;
pub mod error;
mod param_guard;
pub mod prelude;
pub mod traits;

pub use basis::{Basis, BasisFunction, BasisSequence, LinearCombination};
pub use dataset::{Float, Sample};
pub use error::Error;
pub use param_guard::ParamGuard;
