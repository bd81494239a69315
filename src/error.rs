//! Error Handling Infrastructure
//!
//! This module defines the error type used by the decoding and CLI surfaces of docquery.
//! All errors are structured and map to specific error codes for JSON output.
//!
//! Malformed query text is deliberately absent here: the well-formedness gate folds it into
//! a boolean and the editors never turn it into an error.
//!
//! # Error Categories
//! - `InvalidInput`: Malformed host records or missing required parameters
//! - `InvalidQuery`: Query text that cannot be turned into a pipeline value
//! - `Config`: Datasource settings that cannot be decoded
//! - `Io`: Reading input files or prompting the user failed

use thiserror::Error;

/// Main error type for docquery operations
#[derive(Error, Debug)]
pub enum DocQueryError {
    /// Invalid input or missing required parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Query text rejected when building a pipeline value
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Datasource configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File or terminal I/O failed
    #[error("I/O error: {0}")]
    Io(String),
}

impl DocQueryError {
    /// Convert error to error code string for JSON output
    ///
    /// Error codes are stable and suitable for programmatic handling.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }

    /// Human-readable error message, safe to print (never carries secret values)
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an invalid query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery(message.into())
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an I/O error
    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }
}

impl From<std::io::Error> for DocQueryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for docquery operations
pub type Result<T> = std::result::Result<T, DocQueryError>;
