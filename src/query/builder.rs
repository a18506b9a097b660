//! # Query Builder
//!
//! Accumulates filter/order/limit state for one remote entity collection and
//! hands it to the connection on a terminal call. A builder is consumed by
//! its terminal call; its state produces exactly one HTTP request and never
//! outlives it.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::connection::RemoteConnection;
use crate::entity::{self, Entity};

use super::errors::{QueryError, QueryResult};

/// Sort direction for `order_by`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Builder for one query against a remote entity collection.
///
/// # Example
///
/// ```ignore
/// let users: Vec<Entity<User>> = connection
///     .table("users")
///     .filter("status", "active")
///     .order_by("name", SortDirection::Asc)
///     .limit(20)
///     .get()
///     .await?;
/// ```
#[derive(Debug)]
pub struct Query<T> {
    connection: Arc<RemoteConnection>,
    from: String,
    filters: Map<String, Value>,
    order_by: Map<String, Value>,
    limit: Option<u64>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Query<T> {
    /// Create a builder targeting `from` on the given connection
    pub fn new(connection: Arc<RemoteConnection>, from: impl Into<String>) -> Self {
        Self {
            connection,
            from: from.into(),
            filters: Map::new(),
            order_by: Map::new(),
            limit: None,
            _record: PhantomData,
        }
    }

    /// Retarget the builder at another collection
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    /// Add an equality filter. Repeating a column overwrites its value.
    ///
    /// Equality is the only predicate the remote API can answer; the
    /// operator-bearing shape is [`Query::filter_op`].
    pub fn filter(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(column.into(), value.into());
        self
    }

    /// The operator-bearing filter shape. Only `"="` is accepted; any other
    /// operator fails before a request is ever built.
    pub fn filter_op(
        self,
        column: impl Into<String>,
        operator: &str,
        value: impl Into<Value>,
    ) -> QueryResult<Self> {
        if operator != "=" {
            return Err(QueryError::Unsupported(format!(
                "remote entities only support equality filters, got operator \"{}\"",
                operator
            )));
        }
        Ok(self.filter(column, value))
    }

    /// Append a sort key. Repeated calls accumulate in call order; repeating
    /// a column overwrites its direction in place.
    pub fn order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by
            .insert(column.into(), Value::from(direction.as_str()));
        self
    }

    /// Cap the number of returned records. Zero clears the limit.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = if limit > 0 { Some(limit) } else { None };
        self
    }

    /// Merged payload for `get`: the filters, plus `order_by` only when at
    /// least one sort key is set and `limit` only when positive
    fn select_payload(&self) -> Map<String, Value> {
        let mut payload = self.filters.clone();
        if !self.order_by.is_empty() {
            payload.insert(
                "order_by".to_string(),
                Value::Object(self.order_by.clone()),
            );
        }
        if let Some(limit) = self.limit {
            payload.insert("limit".to_string(), Value::from(limit));
        }
        payload
    }

    /// Insert a record; a remote rejection collapses to `Ok(false)`.
    ///
    /// This is the one write whose remote-status failures are swallowed into
    /// the flag. Use [`Query::insert_get_id`] to surface them instead.
    pub async fn create(self, attributes: impl Serialize) -> QueryResult<bool> {
        let payload = to_object(attributes)?;
        Ok(self.connection.insert(&self.from, payload).await?)
    }

    /// Insert a record and return the generated id from the response payload
    pub async fn insert_get_id(self, attributes: impl Serialize) -> QueryResult<u64> {
        let payload = to_object(attributes)?;
        let data = self.connection.insert_get(&self.from, payload).await?;
        data.get("id")
            .and_then(Value::as_u64)
            .ok_or(QueryError::MissingId)
    }

    /// Update the record addressed by the numeric `id` in `values`.
    ///
    /// Reports one affected row on success; the remote does not echo a count.
    pub async fn update(self, values: impl Serialize) -> QueryResult<u64> {
        let payload = to_object(values)?;
        Ok(self.connection.update(&self.from, payload).await?)
    }

    /// Delete the record addressed by the builder's single `id` filter
    pub async fn delete(self) -> QueryResult<u64> {
        let Query {
            connection,
            from,
            filters,
            ..
        } = self;
        Ok(connection.delete(&from, filters).await?)
    }
}

impl<T: DeserializeOwned> Query<T> {
    /// Fetch every matching record, in remote order
    pub async fn get(self) -> QueryResult<Vec<Entity<T>>> {
        let payload = self.select_payload();
        let data = self.connection.select(&self.from, payload).await?;
        Ok(entity::to_collection(data, true)?)
    }

    /// Fetch a single record. Order and limit are not forwarded; the filter
    /// set alone addresses the record.
    pub async fn first(self) -> QueryResult<Entity<T>> {
        let Query {
            connection,
            from,
            filters,
            ..
        } = self;
        let data = connection.select_one(&from, filters).await?;
        Ok(entity::to_entity(data, true)?)
    }

    /// Fetch by id. A remote 404 and an empty payload both yield `None`;
    /// every other failure propagates.
    pub async fn find(self, id: u64) -> QueryResult<Option<Entity<T>>> {
        let mut filters = Map::new();
        filters.insert("id".to_string(), Value::from(id));

        let data = match self.connection.select_one(&self.from, filters).await {
            Ok(data) => data,
            Err(err) if err.is_not_found() => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        match data {
            Value::Null => Ok(None),
            Value::Array(elements) if elements.is_empty() => Ok(None),
            data => Ok(Some(entity::to_entity(data, true)?)),
        }
    }
}

/// Serialize terminal-call attributes into the flat JSON object the remote
/// expects
fn to_object(attributes: impl Serialize) -> QueryResult<Map<String, Value>> {
    match serde_json::to_value(attributes)? {
        Value::Object(map) => Ok(map),
        other => Err(QueryError::Unsupported(format!(
            "payload must serialize to a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
