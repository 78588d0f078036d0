//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse config file '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A value failed validation.
    #[error("Invalid configuration value '{field}': {message}")]
    ValidationError { field: String, message: String },

    /// A listing selector could not be compiled.
    #[error("Invalid {field} selector '{selector}': {message}")]
    InvalidSelector {
        field: String,
        selector: String,
        message: String,
    },
}
