//! Error types for Map Shell.

use thiserror::Error;

/// Result type alias for Map Shell operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Map Shell operations.
#[derive(Error, Debug)]
pub enum Error {
    // Data provider errors
    #[error("Data provider identifier must not be empty")]
    EmptyProviderIdentifier,

    #[error("Data provider '{0}' is already registered by another plugin")]
    DuplicateProvider(String),

    // Load errors
    #[error("Failed to import plugin module '{name}' from {url}: {reason}")]
    ImportFailed {
        name: String,
        url: String,
        reason: String,
    },

    #[error("Invalid import url for '{name}': {reason}")]
    InvalidImportUrl { name: String, reason: String },

    #[error("Plugin '{import}' could not be created: {reason}")]
    PluginCreation { import: String, reason: String },

    #[error("Plugins are already loaded")]
    AlreadyLoaded,

    // Environment errors
    #[error("Directory access failed: {0}")]
    DirectoryAccess(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error is a configuration mistake rather than a runtime failure.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyProviderIdentifier
                | Error::DuplicateProvider(_)
                | Error::InvalidImportUrl { .. }
                | Error::Config(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Config(format!("invalid url: {}", err))
    }
}
