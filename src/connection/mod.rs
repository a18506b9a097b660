//! # Remote Connection
//!
//! The transport half of the crate: per-connection configuration and
//! identity, URL resolution, and the HTTP operations the query builder
//! delegates to.
//!
//! # Supported Operations
//!
//! - select / select_one
//! - insert / insert_get
//! - update
//! - delete

mod errors;
mod remote;
mod response;
mod token;

pub use errors::{ConnectionError, ConnectionResult};
pub use remote::RemoteConnection;
pub use token::{NoToken, StaticToken, TokenProvider};
