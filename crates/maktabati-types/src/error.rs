use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid id: {0:?}")]
    InvalidId(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
