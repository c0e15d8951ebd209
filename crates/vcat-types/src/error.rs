use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("content key must have at least one element")]
    EmptyKey,

    #[error("empty element at position {index} in '{path}'")]
    EmptyElement { path: String, index: usize },
}
