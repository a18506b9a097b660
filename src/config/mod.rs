//! # Connection Configuration
//!
//! Per-connection settings for a remote REST endpoint and the `ConfigSource`
//! capability the registry uses to look them up by name.
//!
//! Configuration is parsed once, when a named connection is first requested,
//! and never mutated afterwards. Where the settings actually live (files,
//! environment, a deployed config store) is the caller's concern.

mod errors;

pub use errors::{ConfigError, ConfigResult};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Configuration for one named remote connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Host and optional path prefix, without protocol (e.g. "api.example.com")
    pub base_url: String,

    /// Protocol prefix (default: "http://")
    #[serde(default = "default_protocol")]
    pub protocol: String,

    /// API version, with or without the leading "v" (default: "1")
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

fn default_protocol() -> String {
    "http://".to_string()
}

fn default_api_version() -> String {
    "1".to_string()
}

impl ConnectionConfig {
    /// Create a config for the given base URL with default protocol and version
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            protocol: default_protocol(),
            api_version: default_api_version(),
        }
    }

    /// Override the protocol prefix
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    /// Override the API version
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// The URL path segment for the API version, normalized to always carry
    /// the leading "v"
    pub fn version_segment(&self) -> String {
        if self.api_version.starts_with('v') {
            self.api_version.clone()
        } else {
            format!("v{}", self.api_version)
        }
    }
}

/// Capability for resolving a named connection's configuration.
///
/// The registry asks for a config exactly once per name, the first time that
/// connection is requested.
pub trait ConfigSource: Send + Sync {
    /// The configuration for `name`, or `None` if the name is unknown
    fn connection_config(&self, name: &str) -> Option<ConnectionConfig>;
}

/// In-memory `ConfigSource` backed by a map of named configurations
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    connections: HashMap<String, ConnectionConfig>,
}

impl StaticConfig {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named connection configuration
    pub fn with_connection(mut self, name: impl Into<String>, config: ConnectionConfig) -> Self {
        self.connections.insert(name.into(), config);
        self
    }
}

impl ConfigSource for StaticConfig {
    fn connection_config(&self, name: &str) -> Option<ConnectionConfig> {
        self.connections.get(name).cloned()
    }
}
