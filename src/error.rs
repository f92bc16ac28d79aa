//! Error types in Polychaos
//!

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Malformed inputs: empty samples, size or dimension mismatches
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
