//! Core type definitions for the health card client.
//!
//! This crate defines the module-agnostic types every other crate uses:
//! - Record identifiers (server-assigned integers)
//! - Load generation tokens for ordering overlapping fetches
//! - The `{success, message?, ...}` response envelope
//!
//! Entity shapes (allergies, vaccinations, ...) live in `healthcard-model`.

mod envelope;
mod ids;

pub use envelope::Envelope;
pub use ids::{LoadGeneration, RecordId};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid record id: {0}")]
    InvalidId(String),

    #[error("field `{key}` has unexpected shape: {source}")]
    FieldShape {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
