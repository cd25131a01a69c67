//! Error types for the common library.
//!
//! This module provides a unified error hierarchy using `thiserror` for
//! consistent error handling across the function.
//!
//! # Error Categories
//!
//! - `ConfigError`: Invalid configuration values (returned by `Config::from_env`)
//! - `StorageError`: S3 object operations
//! - `Error::Synthesis`: Speech synthesis failures (includes the engine used)
//! - `Error::Validation`: Input validation failures

use thiserror::Error;

/// Unified error type for the common library.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage errors (failed uploads)
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Speech synthesis errors with the engine that was requested
    #[error("Speech synthesis failed with {engine} engine: {message}")]
    Synthesis {
        /// Engine the failing request used (e.g. "neural")
        engine: String,
        /// Error message from the service or describing the failure
        message: String,
    },

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Create a new synthesis error.
    ///
    /// # Example
    ///
    /// ```
    /// use tts_lambda_common::error::Error;
    ///
    /// let err = Error::synthesis("neural", "Voice Joanna does not support engine");
    /// assert!(err.to_string().contains("neural"));
    /// ```
    pub fn synthesis(engine: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Synthesis {
            engine: engine.into(),
            message: message.into(),
        }
    }

    /// Create a new validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl ConfigError {
    /// Create a new invalid value error.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue(name.into(), reason.into())
    }
}

/// Storage operation type for error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOperation {
    /// PutObject
    Upload,
}

impl std::fmt::Display for StorageOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageOperation::Upload => write!(f, "upload"),
        }
    }
}

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An S3 operation failed with context about the URI and operation type
    #[error("S3 {operation} failed for {uri}: {message}")]
    OperationFailed {
        /// The S3 URI that was being accessed
        uri: String,
        /// The type of operation that failed
        operation: StorageOperation,
        /// Error message describing the failure
        message: String,
    },
}

impl StorageError {
    /// Create a new operation failed error with full context.
    ///
    /// # Example
    ///
    /// ```
    /// use tts_lambda_common::error::{StorageError, StorageOperation};
    ///
    /// let err = StorageError::operation_failed(
    ///     "s3://my-bucket/speech.mp3",
    ///     StorageOperation::Upload,
    ///     "Access Denied"
    /// );
    /// assert!(err.to_string().contains("s3://my-bucket"));
    /// assert!(err.to_string().contains("upload"));
    /// ```
    pub fn operation_failed(
        uri: impl Into<String>,
        operation: StorageOperation,
        message: impl Into<String>,
    ) -> Self {
        StorageError::OperationFailed {
            uri: uri.into(),
            operation,
            message: message.into(),
        }
    }
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;
