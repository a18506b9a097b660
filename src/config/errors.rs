//! # Configuration Errors
//!
//! Error types for connection configuration lookup and validation.

use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Connection configuration errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No configuration registered under the requested connection name
    #[error("Connection [{0}] not configured")]
    UnknownConnection(String),

    /// Connection configuration carries no usable base URL
    #[error("API base URL not set in connection configuration")]
    MissingBaseUrl,
}
