//! Error types.

use thiserror::Error;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The network configuration cannot describe a trainable network.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A vector, matrix or batch had the wrong length.
    #[error("shape mismatch in {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A target label is not one of the network's output labels.
    #[error("unknown label: {0}")]
    UnknownLabel(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding error: {0}")]
    Encoding(#[from] bincode::Error),
}

impl Error {
    pub(crate) fn shape(what: &'static str, expected: usize, actual: usize) -> Self {
        Error::ShapeMismatch {
            what,
            expected,
            actual,
        }
    }
}

/// Returns a `ShapeMismatch` error unless `actual == expected`.
pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::shape(what, expected, actual))
    }
}
