#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use polychaos::{Float, ParamGuard};

use crate::error::{LarsError, Result};

/// A verified parameter set ready for building least angle regression paths
///
/// See [`LarsParams`] for more information.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct LarsValidParams<F> {
    max_relative_convergence: F,
}

impl<F: Float> LarsValidParams<F> {
    pub fn max_relative_convergence(&self) -> F {
        self.max_relative_convergence
    }
}

/// A parameter set for least angle regression
///
/// # Parameters
/// | Name | Default | Purpose | Range |
/// | :--- | :--- | :---| :--- |
/// | [max_relative_convergence](Self::max_relative_convergence) | `1e-5` | Relative change of the coefficients L1 norm below which the path stops early | `[0, inf)` |
///
/// # Errors
///
/// Returns [`InvalidConvergence`](LarsError::InvalidConvergence) if the threshold is
/// negative or not finite.
///
/// # Example
///
/// ```rust
/// use polychaos::{prelude::*, Basis};
/// use polychaos_lars::{Lars, LarsError};
/// use ndarray::array;
///
/// let x = array![[1f64], [2.], [3.], [4.], [5.], [6.]];
/// let y = array![[1.], [4.], [9.], [16.], [25.], [36.]];
///
/// let sequence = Lars::params()
///     .max_relative_convergence(1e-8)
///     .build(&x, &y, &Basis::monomials(2))?;
///
/// assert_eq!(sequence.indices(0), &[2]);
/// # Ok::<(), LarsError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LarsParams<F>(LarsValidParams<F>);

impl<F: Float> Default for LarsParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> LarsParams<F> {
    /// Create default least angle regression parameters
    pub fn new() -> Self {
        Self(LarsValidParams {
            max_relative_convergence: F::cast(1e-5),
        })
    }

    /// Set the threshold on the relative change of the L1 norm of the coefficients. The
    /// path stops as soon as one iteration changes the norm by less than this amount.
    ///
    /// Defaults to `1e-5` if not set
    pub fn max_relative_convergence(mut self, max_relative_convergence: F) -> Self {
        self.0.max_relative_convergence = max_relative_convergence;
        self
    }
}

impl<F: Float> ParamGuard for LarsParams<F> {
    type Checked = LarsValidParams<F>;
    type Error = LarsError;

    /// Validate the parameters
    fn check_ref(&self) -> Result<&Self::Checked> {
        let threshold = self.0.max_relative_convergence;
        if !threshold.is_finite() || threshold < F::zero() {
            Err(LarsError::InvalidConvergence(
                threshold.to_f32().unwrap_or(f32::NAN),
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
