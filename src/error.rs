// src/error.rs
//! Error types for bundle loading and recipe rendering

use thiserror::Error;

/// Errors surfaced by galley
///
/// Architecture classification has no variant here: `classify` is total
/// and never fails, so an unrecognized identifier becomes a named variant
/// in the output rather than an error.
#[derive(Error, Debug)]
pub enum Error {
    /// A required configuration value is absent and has no default
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Section registry or override misuse, detected before any output
    #[error("Template error: {0}")]
    TemplateError(String),

    /// Malformed bundle manifest
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed reading or scanning a bundle directory
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e.to_string())
    }
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
