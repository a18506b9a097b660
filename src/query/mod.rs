//! # Query Builder
//!
//! The accumulation half of the crate: filter/order/limit state plus the
//! terminal operations that each trigger exactly one HTTP request.

mod builder;
mod errors;

pub use builder::{Query, SortDirection};
pub use errors::{QueryError, QueryResult};
