//! # Query Errors
//!
//! Error types surfaced by the query builder's terminal operations.

use thiserror::Error;

use crate::connection::ConnectionError;
use crate::entity::EntityError;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Query builder errors
#[derive(Debug, Error)]
pub enum QueryError {
    /// The requested predicate or payload shape is outside the supported
    /// query vocabulary
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// The insert response carried no usable generated id
    #[error("Insert response payload has no numeric id field")]
    MissingId,

    /// The terminal-call payload could not be serialized
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// Failure at the transport layer
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// The response payload did not map into the record type
    #[error(transparent)]
    Entity(#[from] EntityError),
}

impl QueryError {
    /// The remote status code, when the remote produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            QueryError::Connection(err) => err.status(),
            _ => None,
        }
    }
}
