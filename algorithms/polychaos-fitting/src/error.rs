use linfa_linalg::LinalgError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FittingError>;

#[derive(Error, Debug)]
pub enum FittingError {
    #[error(transparent)]
    BaseCrate(#[from] polychaos::Error),
    #[error(transparent)]
    LinalgError(#[from] LinalgError),
    #[error("number of folds should be at least 1, got {0}")]
    InvalidFoldCount(usize),
    #[error("K should be < size (k={k}, size={size})")]
    TooManyFolds { k: usize, size: usize },
    #[error("Null output sample variance")]
    NullVariance,
    /// The Tikhonov penalty is negative or not finite
    #[error("penalty should be non-negative, got {0}")]
    InvalidPenalty(f32),
    #[error("invalid weights: {0}")]
    InvalidWeights(String),
    #[error("not enough samples ({size}) to fit a basis of {basis_size} functions")]
    NotEnoughSamples { size: usize, basis_size: usize },
    /// The least squares coefficients are not finite, the design matrix is rank deficient
    #[error("ill-conditioned design matrix")]
    IllConditioned,
    #[error("basis sequence is empty")]
    EmptySequence,
    /// The basis sequence factory failed
    #[error("basis sequence factory failed: {0}")]
    Factory(#[source] Box<dyn std::error::Error + Send + Sync>),
}
