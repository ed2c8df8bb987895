//! Error types for the sync layer.

use healthcard_model::{FieldError, ModelError};
use healthcard_types::RecordId;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while talking to the health card server.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response whose body was not an envelope.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// 2xx response whose body was not an envelope.
    #[error("decode error: {0}")]
    Decode(String),

    /// Request could not be encoded.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Payload did not match the expected record shape.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Envelope payload under a key had the wrong shape.
    #[error(transparent)]
    Payload(#[from] healthcard_types::Error),

    /// The server answered `success: false`.
    #[error("rejected: {0}")]
    Rejected(String),

    /// Input was refused before any request was made.
    #[error("invalid input: {}", join(.0))]
    Validation(Vec<FieldError>),

    /// The module has no route for the operation.
    #[error("{module} does not support {operation}")]
    Unsupported {
        module: &'static str,
        operation: &'static str,
    },

    /// No record with this id is loaded.
    #[error("record {0} is not loaded")]
    UnknownRecord(RecordId),

    /// The operation needs an open modal.
    #[error("no modal is open")]
    NoModal,

    /// The open modal is read-only.
    #[error("modal is view-only")]
    ViewOnly,

    /// A save is already in flight.
    #[error("a save is already in progress")]
    Busy,

    /// The form has no field with this name.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Timeout.
    #[error("operation timed out")]
    Timeout,
}

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
