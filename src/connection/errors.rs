//! # Connection Errors
//!
//! Error types for the transport half of the crate: everything that can go
//! wrong while turning builder state into an HTTP request or decoding the
//! response envelope.

use thiserror::Error;

use crate::config::ConfigError;

/// Result type for connection operations
pub type ConnectionResult<T> = Result<T, ConnectionError>;

/// Remote connection errors
#[derive(Debug, Error)]
pub enum ConnectionError {
    // ==================
    // Configuration
    // ==================
    /// Connection configuration is missing or unusable
    #[error(transparent)]
    Config(#[from] ConfigError),

    // ==================
    // Identity
    // ==================
    /// `set_name` called on a connection that already has a name
    #[error("Connection name already set")]
    NameAlreadySet,

    /// `name` read before the registry assigned one
    #[error("Connection name not set")]
    NameNotSet,

    // ==================
    // Request validation
    // ==================
    /// The operation cannot be expressed against the remote API
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    // ==================
    // Remote failures
    // ==================
    /// The remote answered with a non-success HTTP status
    #[error("Remote request failed with status {status}: {message}")]
    Remote { status: u16, message: String },

    /// The HTTP call itself failed (connect, TLS, timeout)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not valid JSON
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ConnectionError {
    /// The remote status code, when the remote produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            ConnectionError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the remote answered 404 for the addressed entity
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_only_carried_by_remote_errors() {
        let err = ConnectionError::Remote {
            status: 422,
            message: "Validation failed".to_string(),
        };
        assert_eq!(err.status(), Some(422));
        assert!(!err.is_not_found());

        assert_eq!(ConnectionError::NameNotSet.status(), None);
    }

    #[test]
    fn test_not_found_predicate() {
        let err = ConnectionError::Remote {
            status: 404,
            message: "No such entity".to_string(),
        };
        assert!(err.is_not_found());
    }

    #[test]
    fn test_config_errors_convert() {
        let err = ConnectionError::from(ConfigError::MissingBaseUrl);
        assert!(matches!(err, ConnectionError::Config(_)));
    }
}
