//! Error types for the model layer.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while decoding records or building request bodies.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A record object was missing a field it cannot exist without.
    #[error("record is missing `{0}`")]
    MissingField(&'static str),

    /// A record field had a value of the wrong shape.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// The module has no route for the requested operation.
    #[error("module `{module}` does not support {operation}")]
    Unsupported {
        module: &'static str,
        operation: &'static str,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Identifier error.
    #[error(transparent)]
    Types(#[from] healthcard_types::Error),
}
