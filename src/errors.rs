//! Errors
//!
//! Custom error types used throughout the `quercus` crate.
use thiserror::Error;

/// Errors that can occur in the decision tree classifier.
#[derive(Debug, Error)]
pub enum QuercusError {
    /// Malformed caller input, such as an empty dataset, mismatched
    /// dimensions, or an out-of-range hyperparameter.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A feature index stored in the model does not exist in the query data.
    #[error("Index {index} is out of bounds for a dimension of length {len}.")]
    IndexOutOfBounds { index: usize, len: usize },
    /// An operation was called on a model in the wrong lifecycle state.
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// A model file or stream is structurally unreadable.
    #[error("Corrupt model data: {0}")]
    CorruptData(String),
    /// Unable to read or write a model file.
    #[error("Unable to access model file: {0}")]
    IOError(String),
}
