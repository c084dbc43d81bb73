//! Error types for the Dropbox web manager.

use thiserror::Error;

/// Common error type for application setup and rendering.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for configuration or user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] crate::template::TemplateError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Remote client construction error.
    #[error("client error: {0}")]
    Client(String),
}

/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
