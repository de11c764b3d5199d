//! Core error types for seedwave-core.
//!
//! Errors are split by concern using thiserror: configuration problems,
//! sync/transport failures, and an umbrella `CoreError` for callers that
//! touch more than one layer.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for seedwave-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Sync-related errors
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config directory could not be resolved or created
    #[error("Cannot resolve config directory: {0}")]
    DirUnavailable(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Errors raised while fetching or refreshing tracked resources.
///
/// Per-key failures never escape the sync controller; they are folded into
/// the batch outcome and the status error log instead.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Controller settings rejected at activation
    #[error("invalid sync settings: {0}")]
    InvalidSettings(String),

    /// Activation attempted outside a tokio runtime
    #[error("no async runtime available: {0}")]
    Runtime(String),

    /// Resource key not known to the transport
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// Server answered with a non-success status
    #[error("{key}: server responded with HTTP {status}")]
    Status { key: String, status: u16 },

    /// Generic transport failure for a key
    #[error("{key}: {message}")]
    Fetch { key: String, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl SyncError {
    /// Shorthand for a transport failure with a free-form message.
    pub fn fetch(key: impl Into<String>, message: impl Into<String>) -> Self {
        SyncError::Fetch {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Message recorded in the status error log.
    ///
    /// Free-form fetch failures report their message alone; the key is
    /// already carried by the batch outcome.
    pub fn detail(&self) -> String {
        match self {
            SyncError::Fetch { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
