//! # Connection Registry
//!
//! Resolves connection names to memoized `RemoteConnection` instances,
//! constructing each lazily from the caller-supplied `ConfigSource`.
//!
//! The registry is the only shared mutable state in the crate. One instance
//! is expected to live for the process lifetime; everything it constructs is
//! shared via `Arc`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config::{ConfigError, ConfigSource};
use crate::connection::{ConnectionResult, RemoteConnection, TokenProvider};

/// Registry of named remote connections.
///
/// Under concurrent first access the memo map is locked across
/// lookup-and-construct, so the first successful construction wins and every
/// caller observes the same instance. Construction is a pure configuration
/// lookup; holding the lock across it is cheap.
pub struct ApiManager {
    source: Arc<dyn ConfigSource>,
    token: Option<Arc<dyn TokenProvider>>,
    client: Option<reqwest::Client>,
    connections: Mutex<HashMap<String, Arc<RemoteConnection>>>,
}

impl ApiManager {
    /// Create a registry over the given configuration source
    pub fn new(source: impl ConfigSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
            token: None,
            client: None,
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// Attach a token provider handed to every connection this registry
    /// constructs
    pub fn with_token_provider(mut self, token: Arc<dyn TokenProvider>) -> Self {
        self.token = Some(token);
        self
    }

    /// Attach a preconfigured HTTP client (timeouts, proxies, TLS) handed to
    /// every connection this registry constructs
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Resolve `name` to its connection, constructing and memoizing it on
    /// first request. Failed construction is not memoized.
    pub fn connection(&self, name: &str) -> ConnectionResult<Arc<RemoteConnection>> {
        let mut connections = self.connections.lock().expect("Lock poisoned");
        if let Some(connection) = connections.get(name) {
            return Ok(Arc::clone(connection));
        }
        let connection = self.make_connection(name)?;
        connections.insert(name.to_string(), Arc::clone(&connection));
        Ok(connection)
    }

    fn make_connection(&self, name: &str) -> ConnectionResult<Arc<RemoteConnection>> {
        let config = self
            .source
            .connection_config(name)
            .ok_or_else(|| ConfigError::UnknownConnection(name.to_string()))?;

        let mut connection = RemoteConnection::new(config);
        if let Some(client) = &self.client {
            connection = connection.with_client(client.clone());
        }
        if let Some(token) = &self.token {
            connection = connection.with_token_provider(Arc::clone(token));
        }

        let connection = Arc::new(connection);
        connection.set_name(name)?;
        Ok(connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConnectionConfig, StaticConfig};
    use crate::connection::ConnectionError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// `ConfigSource` that counts how many lookups it served
    struct CountingSource {
        inner: StaticConfig,
        lookups: Arc<AtomicUsize>,
    }

    impl ConfigSource for CountingSource {
        fn connection_config(&self, name: &str) -> Option<ConnectionConfig> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.connection_config(name)
        }
    }

    fn manager() -> ApiManager {
        ApiManager::new(
            StaticConfig::new().with_connection("hub", ConnectionConfig::new("hub.internal")),
        )
    }

    #[test]
    fn test_unknown_name_is_a_configuration_error() {
        let err = manager().connection("missing").unwrap_err();
        assert!(matches!(
            err,
            ConnectionError::Config(ConfigError::UnknownConnection(_))
        ));
    }

    #[test]
    fn test_connection_is_memoized() {
        let manager = manager();
        let first = manager.connection("hub").unwrap();
        let second = manager.connection("hub").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_connection_gets_its_name_assigned() {
        let connection = manager().connection("hub").unwrap();
        assert_eq!(connection.name().unwrap(), "hub");
    }

    #[test]
    fn test_failed_construction_is_not_memoized() {
        let lookups = Arc::new(AtomicUsize::new(0));
        let manager = ApiManager::new(CountingSource {
            inner: StaticConfig::new(),
            lookups: Arc::clone(&lookups),
        });

        assert!(manager.connection("missing").is_err());
        assert!(manager.connection("missing").is_err());
        assert_eq!(lookups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_access_constructs_once() {
        let lookups = Arc::new(AtomicUsize::new(0));
        let manager = Arc::new(ApiManager::new(CountingSource {
            inner: StaticConfig::new()
                .with_connection("reports", ConnectionConfig::new("reports.internal")),
            lookups: Arc::clone(&lookups),
        }));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let manager = Arc::clone(&manager);
            handles.push(tokio::spawn(async move {
                manager.connection("reports").unwrap()
            }));
        }

        let mut connections = Vec::new();
        for handle in handles {
            connections.push(handle.await.unwrap());
        }

        assert_eq!(lookups.load(Ordering::SeqCst), 1);
        for connection in &connections[1..] {
            assert!(Arc::ptr_eq(&connections[0], connection));
        }
    }
}
