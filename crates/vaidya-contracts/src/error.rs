//! Error types for the VaidyaConnect invocation pipeline.
//!
//! All fallible operations return `VaidyaResult<T>`. Variants carry enough
//! context for the facade to log the concrete cause while surfacing only a
//! generic message to callers.

use std::fmt;

use thiserror::Error;

/// The unified error type for the pipeline.
#[derive(Debug, Clone, Error)]
pub enum VaidyaError {
    /// An input field is missing, null, of the wrong type, or too short.
    #[error("validation failed for field '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// The model endpoint was unreachable or answered with an error.
    #[error("model transport failure: {reason}")]
    TransportFailure { reason: String, retryable: bool },

    /// The model answered, but the answer does not satisfy the OutputShape.
    #[error("model output violates schema: {reason}")]
    SchemaViolation { reason: String },

    /// The model produced nothing usable.
    #[error("model returned empty output: {reason}")]
    EmptyOutput { reason: String },

    /// The caller cancelled the invocation before it completed.
    #[error("invocation cancelled")]
    Cancelled,

    /// The caller's identity or capabilities do not permit the action.
    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The code-translation history could not be read or written.
    #[error("history error: {reason}")]
    HistoryError { reason: String },
}

impl VaidyaError {
    /// Stable tag for structured logs.
    pub fn kind(&self) -> ErrorKind {
        match self {
            VaidyaError::Validation { .. } => ErrorKind::Validation,
            VaidyaError::TransportFailure { .. } => ErrorKind::TransportFailure,
            VaidyaError::SchemaViolation { .. } => ErrorKind::SchemaViolation,
            VaidyaError::EmptyOutput { .. } => ErrorKind::EmptyOutput,
            VaidyaError::Cancelled => ErrorKind::Cancelled,
            VaidyaError::Unauthorized { .. } => ErrorKind::Unauthorized,
            VaidyaError::ConfigError { .. } => ErrorKind::Config,
            VaidyaError::HistoryError { .. } => ErrorKind::History,
        }
    }

    /// True for transport failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, VaidyaError::TransportFailure { retryable: true, .. })
    }

    /// Shorthand for a validation failure on `field`.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        VaidyaError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Coarse classification of a `VaidyaError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    TransportFailure,
    SchemaViolation,
    EmptyOutput,
    Cancelled,
    Unauthorized,
    Config,
    History,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::TransportFailure => "transport-failure",
            ErrorKind::SchemaViolation => "schema-violation",
            ErrorKind::EmptyOutput => "empty-output",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Config => "config",
            ErrorKind::History => "history",
        };
        f.write_str(s)
    }
}

/// Convenience alias used throughout the VaidyaConnect crates.
pub type VaidyaResult<T> = Result<T, VaidyaError>;
