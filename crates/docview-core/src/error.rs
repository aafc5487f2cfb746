//! Error types module
//!
//! This module provides the error type shared by the docview crates. Library
//! code returns `DocviewError`; binaries wrap it in `anyhow` with context.
//!
//! Content failures during a preview (broken image, failed text fetch) are not
//! errors at this level: the dispatcher turns them into fallback panels. Only
//! transport, configuration and cancellation problems travel as `DocviewError`.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like a missing document
    Debug,
    /// Warning level - for recoverable issues like a failed fetch
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error reporting - lets callers present an error without
/// matching on every variant.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "NETWORK_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether repeating the same action may succeed
    fn is_recoverable(&self) -> bool;

    /// Message suitable for an end user
    fn user_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum DocviewError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {message}")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type DocviewResult<T> = Result<T, DocviewError>;

impl DocviewError {
    /// Map a non-success HTTP status and its body to an error variant.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let message = body.into();
        match status {
            401 | 403 => DocviewError::Unauthorized(message),
            404 => DocviewError::NotFound(message),
            _ => DocviewError::Http { status, message },
        }
    }

    /// HTTP status carried by this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            DocviewError::Http { status, .. } => Some(*status),
            DocviewError::Unauthorized(_) => Some(401),
            DocviewError::NotFound(_) => Some(404),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, DocviewError::Cancelled)
    }
}

impl From<anyhow::Error> for DocviewError {
    fn from(err: anyhow::Error) -> Self {
        DocviewError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for DocviewError {
    fn from(err: io::Error) -> Self {
        DocviewError::InternalWithSource {
            message: format!("IO error: {}", err),
            source: err.into(),
        }
    }
}

impl From<serde_json::Error> for DocviewError {
    fn from(err: serde_json::Error) -> Self {
        DocviewError::InvalidResponse(format!("JSON parsing error: {}", err))
    }
}

/// Static metadata for each variant: (error_code, recoverable, log_level).
fn static_metadata(err: &DocviewError) -> (&'static str, bool, LogLevel) {
    match err {
        DocviewError::Http { status, .. } if *status >= 500 => {
            ("SERVER_ERROR", true, LogLevel::Error)
        }
        DocviewError::Http { .. } => ("HTTP_ERROR", false, LogLevel::Warn),
        DocviewError::Unauthorized(_) => ("UNAUTHORIZED", false, LogLevel::Warn),
        DocviewError::NotFound(_) => ("NOT_FOUND", false, LogLevel::Debug),
        DocviewError::Network(_) => ("NETWORK_ERROR", true, LogLevel::Warn),
        DocviewError::InvalidResponse(_) => ("INVALID_RESPONSE", false, LogLevel::Error),
        DocviewError::InvalidInput(_) => ("INVALID_INPUT", false, LogLevel::Debug),
        DocviewError::Cache(_) => ("CACHE_ERROR", true, LogLevel::Warn),
        DocviewError::Config(_) => ("CONFIG_ERROR", false, LogLevel::Error),
        DocviewError::Cancelled => ("CANCELLED", true, LogLevel::Debug),
        DocviewError::InternalWithSource { .. } => ("INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl ErrorMetadata for DocviewError {
    fn error_code(&self) -> &'static str {
        static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        static_metadata(self).2
    }

    fn user_message(&self) -> String {
        match self {
            DocviewError::Http { status, .. } if *status >= 500 => {
                "The document service is unavailable".to_string()
            }
            DocviewError::Http { status, .. } => format!("Request failed with status {}", status),
            DocviewError::Unauthorized(_) => "You are not signed in or lack access".to_string(),
            DocviewError::NotFound(ref msg) => msg.clone(),
            DocviewError::Network(_) => "Could not reach the document service".to_string(),
            DocviewError::InvalidResponse(_) => {
                "The document service sent an unexpected response".to_string()
            }
            DocviewError::InvalidInput(ref msg) => msg.clone(),
            DocviewError::Cache(_) => "Internal cache error".to_string(),
            DocviewError::Config(ref msg) => msg.clone(),
            DocviewError::Cancelled => "Cancelled".to_string(),
            DocviewError::InternalWithSource { .. } => "Internal error".to_string(),
        }
    }
}
