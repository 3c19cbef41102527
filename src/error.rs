//! Error types for sql-notebook.
//!
//! Defines the main error enum used by the service, the log store and the
//! editor bridge.

use thiserror::Error;

/// Main error type for sql-notebook operations.
#[derive(Error, Debug)]
pub enum NotebookError {
    /// The request was malformed (missing or empty SQL). Client-correctable.
    #[error("{0}")]
    InvalidRequest(String),

    /// Statement execution failed (syntax errors, constraint violations, lost connection).
    #[error("{0}")]
    Execution(String),

    /// The table catalog could not be read.
    #[error("{0}")]
    CatalogUnavailable(String),

    /// Appending to the query log failed.
    #[error("Log write error: {0}")]
    LogWrite(String),

    /// Database connection errors (host unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network errors between the editor bridge and the service.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl NotebookError {
    /// Creates an invalid request error with the given message.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Creates an execution error with the given message.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Creates a catalog error with the given message.
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::CatalogUnavailable(msg.into())
    }

    /// Creates a log write error with the given message.
    pub fn log_write(msg: impl Into<String>) -> Self {
        Self::LogWrite(msg.into())
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a transport error with the given message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "Invalid Request",
            Self::Execution(_) => "Execution Error",
            Self::CatalogUnavailable(_) => "Catalog Unavailable",
            Self::LogWrite(_) => "Log Write Error",
            Self::Connection(_) => "Connection Error",
            Self::Config(_) => "Configuration Error",
            Self::Transport(_) => "Transport Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using NotebookError.
pub type Result<T> = std::result::Result<T, NotebookError>;
