//! # Remote Connection
//!
//! Owns one remote endpoint's configuration and identity, and turns
//! query-builder state into concrete HTTP requests against the versioned
//! REST API. Every operation issues exactly one request; there is no retry,
//! backoff or caching here. Timeouts and TLS policy belong to the
//! `reqwest::Client` the caller supplies.

use std::sync::{Arc, OnceLock};

use reqwest::header::ACCEPT;
use reqwest::Method;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::{ConfigError, ConnectionConfig};
use crate::query::Query;

use super::errors::{ConnectionError, ConnectionResult};
use super::response;
use super::token::{NoToken, TokenProvider};

/// A connection to one remote REST endpoint.
///
/// The connection name follows a single-assignment discipline: the registry
/// assigns it exactly once right after construction, and both a second
/// assignment and a read before assignment are state errors.
pub struct RemoteConnection {
    config: ConnectionConfig,
    name: OnceLock<String>,
    client: reqwest::Client,
    token: Arc<dyn TokenProvider>,
}

impl std::fmt::Debug for RemoteConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConnection")
            .field("config", &self.config)
            .field("name", &self.name)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl RemoteConnection {
    /// Create a connection with a default HTTP client and no token provider
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            name: OnceLock::new(),
            client: reqwest::Client::new(),
            token: Arc::new(NoToken),
        }
    }

    /// Replace the HTTP client.
    ///
    /// Timeouts, proxies and TLS settings live on the client; the connection
    /// defines none of its own.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Attach the capability that supplies bearer tokens for outgoing requests
    pub fn with_token_provider(mut self, token: Arc<dyn TokenProvider>) -> Self {
        self.token = token;
        self
    }

    /// Assign the connection name. May succeed exactly once.
    pub fn set_name(&self, name: impl Into<String>) -> ConnectionResult<()> {
        self.name
            .set(name.into())
            .map_err(|_| ConnectionError::NameAlreadySet)
    }

    /// The assigned connection name. Fails until `set_name` has run.
    pub fn name(&self) -> ConnectionResult<&str> {
        self.name
            .get()
            .map(String::as_str)
            .ok_or(ConnectionError::NameNotSet)
    }

    /// Open a query builder for `table` on this connection
    pub fn table<T>(self: &Arc<Self>, table: impl Into<String>) -> Query<T> {
        Query::new(Arc::clone(self), table)
    }

    /// Compose the request URL for an entity collection and optional extra
    /// path segment
    pub fn resolve_url(&self, entity: &str, path: Option<&str>) -> ConnectionResult<String> {
        if self.config.base_url.is_empty() {
            return Err(ConfigError::MissingBaseUrl.into());
        }
        let mut url = format!(
            "{}{}/api/{}/{}",
            self.config.protocol,
            self.config.base_url.trim_end_matches('/'),
            self.config.version_segment(),
            entity
        );
        if let Some(path) = path.filter(|p| !p.is_empty()) {
            url.push('/');
            url.push_str(path.trim_matches('/'));
        }
        Ok(url)
    }

    /// `GET {entity}/search` with the full filter payload
    pub async fn select(
        &self,
        entity: &str,
        filters: Map<String, Value>,
    ) -> ConnectionResult<Value> {
        self.perform_request(Method::GET, entity, filters, Some("search".to_string()))
            .await
    }

    /// Single-result select.
    ///
    /// A numeric `id` filter addresses the entity directly and drops every
    /// other filter; anything else goes through the search path. Whether the
    /// search actually yields a single result is the remote's business.
    pub async fn select_one(
        &self,
        entity: &str,
        filters: Map<String, Value>,
    ) -> ConnectionResult<Value> {
        if let Some(id) = filters.get("id").and_then(numeric_id) {
            return self
                .perform_request(Method::GET, entity, Map::new(), Some(id))
                .await;
        }
        self.perform_request(Method::GET, entity, filters, Some("search".to_string()))
            .await
    }

    /// `POST {entity}`, collapsing a remote rejection to `Ok(false)`.
    ///
    /// Only the remote's own non-success status is folded into the flag;
    /// transport and decode failures still propagate.
    pub async fn insert(
        &self,
        entity: &str,
        payload: Map<String, Value>,
    ) -> ConnectionResult<bool> {
        match self.insert_get(entity, payload).await {
            Ok(_) => Ok(true),
            Err(ConnectionError::Remote { .. }) => Ok(false),
            Err(other) => Err(other),
        }
    }

    /// `POST {entity}`, re-raising on failure and returning the decoded
    /// payload (the road to a remotely generated id)
    pub async fn insert_get(
        &self,
        entity: &str,
        payload: Map<String, Value>,
    ) -> ConnectionResult<Value> {
        self.perform_request(Method::POST, entity, payload, None)
            .await
    }

    /// `PUT {entity}/{id}` with the id stripped out of the body.
    ///
    /// The remote reports no row count; one affected row is assumed.
    pub async fn update(
        &self,
        entity: &str,
        mut payload: Map<String, Value>,
    ) -> ConnectionResult<u64> {
        let id = payload
            .remove("id")
            .as_ref()
            .and_then(numeric_id)
            .ok_or_else(|| {
                ConnectionError::Unsupported("update requires a numeric id field".to_string())
            })?;
        self.perform_request(Method::PUT, entity, payload, Some(id))
            .await?;
        Ok(1)
    }

    /// `DELETE {entity}/{id}`. The payload must be exactly one numeric `id`.
    pub async fn delete(
        &self,
        entity: &str,
        payload: Map<String, Value>,
    ) -> ConnectionResult<u64> {
        let id = match (payload.len(), payload.get("id")) {
            (1, Some(value)) => numeric_id(value),
            _ => None,
        }
        .ok_or_else(|| {
            ConnectionError::Unsupported(
                "delete is only supported by a single numeric id".to_string(),
            )
        })?;
        self.perform_request(Method::DELETE, entity, Map::new(), Some(id))
            .await?;
        Ok(1)
    }

    async fn perform_request(
        &self,
        method: Method,
        entity: &str,
        payload: Map<String, Value>,
        path: Option<String>,
    ) -> ConnectionResult<Value> {
        let url = self.resolve_url(entity, path.as_deref())?;
        let payload = preprocess(payload);

        debug!(%method, %url, "issuing remote request");

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json")
            .json(&payload);
        if let Some(token) = self.token.bearer_token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(response::decode_success(&body)?);
        }
        warn!(%method, %url, status = status.as_u16(), "remote request failed");
        Err(response::decode_failure(status.as_u16(), &body))
    }
}

/// Rename the builder's `limit` to the remote API's `per_page` vocabulary
fn preprocess(mut payload: Map<String, Value>) -> Map<String, Value> {
    if let Some(limit) = payload.remove("limit") {
        payload.insert("per_page".to_string(), limit);
    }
    payload
}

/// A value usable as a numeric id path segment.
///
/// Accepts JSON numbers and all-digit strings, mirroring the loose numeric
/// check of the remote API contract.
fn numeric_id(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => {
            Some(s.clone())
        }
        _ => None,
    }
}
