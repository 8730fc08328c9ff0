// models/src/errors.rs

use std::io;

pub use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Invalid data provided: {0}")]
    InvalidData(String),
    #[error("Failed to acquire lock: {0}")]
    LockError(String),
    #[error("An internal error occurred: {0}")]
    InternalError(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            StoreError::StorageError(format!("JSON I/O error: {}", err))
        } else if err.is_data() || err.is_syntax() || err.is_eof() {
            StoreError::DeserializationError(format!("JSON processing error: {}", err))
        } else {
            StoreError::SerializationError(format!("JSON processing error: {}", err))
        }
    }
}

/// A validation error raised at the write path.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// An assessment arrived without a usable patient reference.
    #[error("assessment is missing a patient reference")]
    MissingPatientReference,
    /// A domain name was empty.
    #[error("domain name must not be empty")]
    EmptyDomain,
    /// A parameter name within a domain was empty.
    #[error("parameter name in domain '{0}' must not be empty")]
    EmptyParameter(String),
    /// A severity value fell outside the rating scale.
    #[error("score for '{domain}/{parameter}' is {value}, expected {min}..={max}")]
    ScoreOutOfRange {
        domain: String,
        parameter: String,
        value: i64,
        min: i64,
        max: i64,
    },
}

/// A type alias for a `Result` that returns a `StoreError` on failure.
pub type StoreResult<T> = Result<T, StoreError>;

/// A type alias for a `Result` that returns a `ValidationError` on failure.
pub type ValidationResult<T> = Result<T, ValidationError>;
