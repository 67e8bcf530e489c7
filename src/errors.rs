/*!
 * Error types for the scriptsmith application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when reading or writing a document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The input bytes are not a readable document of the expected format
    #[error("Input is not a valid document: {0}")]
    InputFormat(String),

    /// Serializing the output document failed
    #[error("Failed to write document: {0}")]
    Write(String),

    /// Underlying I/O failure while reading or writing a container
    #[error("Document I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for DocumentError {
    fn from(error: zip::result::ZipError) -> Self {
        match error {
            zip::result::ZipError::Io(io) => Self::Io(io),
            other => Self::InputFormat(other.to_string()),
        }
    }
}

/// Errors raised when the configuration is inconsistent
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configuration value is outside its accepted range
    #[error("Invalid configuration value for '{field}': {message}")]
    Invalid {
        /// Dotted path of the offending field
        field: String,
        /// Why the value was rejected
        message: String,
    },
}

impl ConfigError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Errors that can occur while converting one transcript
#[derive(Error, Debug)]
pub enum ConversionError {
    /// Error from the document reader or writer
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Error in the configuration driving the conversion
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The input file type is not one the converter understands
    #[error("Unsupported input file: {0}")]
    UnsupportedInput(String),

    /// Error reading the input or writing the output file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a conversion
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Error from the configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
