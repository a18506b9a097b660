//! remoteql - relational-style queries over entities behind a remote REST API
//!
//! A query is built with a small uniform vocabulary (`filter`, `order_by`,
//! `limit`, plus the terminal operations `get`, `first`, `find`, `create`,
//! `insert_get_id`, `update` and `delete`) and deterministically becomes
//! exactly one HTTP request against a versioned endpoint. The JSON envelope
//! in the response maps back into typed records carrying an `exists` flag.
//!
//! # Example
//!
//! ```ignore
//! use remoteql::{ApiManager, ConnectionConfig, SortDirection, StaticConfig};
//!
//! let manager = ApiManager::new(
//!     StaticConfig::new().with_connection("hub", ConnectionConfig::new("api.example.com")),
//! );
//! let connection = manager.connection("hub")?;
//!
//! let users = connection
//!     .table::<User>("users")
//!     .filter("status", "active")
//!     .order_by("name", SortDirection::Asc)
//!     .limit(20)
//!     .get()
//!     .await?;
//! ```

pub mod config;
pub mod connection;
pub mod entity;
pub mod manager;
pub mod query;

pub use config::{ConfigError, ConfigSource, ConnectionConfig, StaticConfig};
pub use connection::{ConnectionError, NoToken, RemoteConnection, StaticToken, TokenProvider};
pub use entity::{Entity, EntityError, RemoteModel};
pub use manager::ApiManager;
pub use query::{Query, QueryError, SortDirection};
