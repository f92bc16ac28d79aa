use linfa_linalg::LinalgError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LarsError>;

#[derive(Error, Debug)]
pub enum LarsError {
    #[error(transparent)]
    BaseCrate(#[from] polychaos::Error),
    #[error(transparent)]
    LinalgError(#[from] LinalgError),
    /// The convergence threshold is negative or not finite
    #[error("invalid maximum relative convergence {0}")]
    InvalidConvergence(f32),
    /// The new predictor is (numerically) a linear combination of the active ones
    #[error("predictor {index} is collinear with the active set (discriminant {discriminant})")]
    CollinearPredictor { index: usize, discriminant: f64 },
    #[error("correlations with the residual are not finite")]
    NonFiniteCorrelation,
}
