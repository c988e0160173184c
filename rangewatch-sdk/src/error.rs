//! Error types for monitor collaborators.

use thiserror::Error;

/// Errors reported by a [`StateStore`](crate::StateStore).
///
/// The monitor never propagates these; they are logged and the monitor
/// carries on in memory.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The namespace could not be opened.
    #[error("Failed to open namespace {namespace}: {reason}")]
    Open { namespace: String, reason: String },

    /// Writing the record failed.
    #[error("Failed to write record: {0}")]
    Write(String),

    /// Reading the record failed.
    #[error("Failed to read record: {0}")]
    Read(String),

    /// The stored bytes are not a record.
    #[error("Failed to decode record: {0}")]
    Decode(String),
}

/// Errors returned when a tunable is set through a [`ConfigHandle`](crate::ConfigHandle).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    /// The value kind does not match the parameter.
    #[error("Parameter {field} expects a {expected} value")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    /// The value is of the right kind but not acceptable.
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },

    /// No parameter is registered under this path.
    #[error("Unknown parameter: {0}")]
    Unknown(String),
}
