//! Error types for adapters.

use rangewatch_sdk::StoreError;
use thiserror::Error;

/// Errors that can occur inside the bundled adapters.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to encode a record.
    #[error("Failed to encode record: {0}")]
    Encode(String),

    /// Failed to decode a record.
    #[error("Failed to decode record: {0}")]
    Decode(String),

    /// Namespace is not usable as a storage key.
    #[error("Invalid namespace: {0:?}")]
    InvalidNamespace(String),
}

impl From<AdapterError> for StoreError {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::Io(e) => StoreError::Write(e.to_string()),
            AdapterError::Encode(e) => StoreError::Write(e),
            AdapterError::Decode(e) => StoreError::Decode(e),
            AdapterError::InvalidNamespace(ns) => StoreError::Open {
                namespace: ns,
                reason: "invalid namespace".to_string(),
            },
        }
    }
}
