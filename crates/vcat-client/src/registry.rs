//! Pre-configured catalog services looked up by key.
//!
//! A [`ClientRegistry`] is filled once at startup and is read-only from then
//! on. A [`ClientBuilder`] picks an entry by a key read from configuration,
//! which lets tests hand a prepared [`CatalogApi`] to code that only knows
//! how to build clients from options.

use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use tracing::{debug, warn};
use vcat_api::CatalogApi;
use vcat_types::CommitHash;

use crate::client::CatalogClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Option naming the registry entry a [`ClientBuilder`] should use.
pub const CLIENT_KEY_OPTION: &str = "vcat.client.key";

/// Environment variable read by [`ClientBuilder::from_env`].
pub const CLIENT_KEY_ENV: &str = "VCAT_CLIENT_KEY";

/// Key used when configuration does not name one.
pub const DEFAULT_CLIENT_KEY: &str = "defaultKey";

/// Immutable table of catalog services keyed by name.
#[derive(Clone, Default)]
pub struct ClientRegistry {
    entries: HashMap<String, Arc<dyn CatalogApi>>,
}

impl ClientRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// The service registered under `key`.
    pub fn get(&self, key: &str) -> Option<Arc<dyn CatalogApi>> {
        self.entries.get(key).cloned()
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ClientRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

/// Collects entries for a [`ClientRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    entries: HashMap<String, Arc<dyn CatalogApi>>,
}

impl RegistryBuilder {
    /// Register `api` under `key`. A later registration replaces an earlier
    /// one with the same key.
    pub fn register(mut self, key: impl Into<String>, api: Arc<dyn CatalogApi>) -> Self {
        let key = key.into();
        if self.entries.insert(key.clone(), api).is_some() {
            warn!(key = %key, "replacing registered client");
        }
        self
    }

    pub fn build(self) -> ClientRegistry {
        debug!(entries = self.entries.len(), "client registry built");
        ClientRegistry {
            entries: self.entries,
        }
    }
}

/// Builds clients from a registry entry chosen by configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientBuilder {
    key: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            key: DEFAULT_CLIENT_KEY.to_string(),
        }
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the registry key from `config` under [`CLIENT_KEY_OPTION`].
    pub fn from_config<F>(mut self, config: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = config(CLIENT_KEY_OPTION) {
            self.key = key;
        }
        self
    }

    /// Read the registry key from the [`CLIENT_KEY_ENV`] environment variable.
    pub fn from_env(self) -> Self {
        self.from_env_lookup(|var| env::var(var).ok())
    }

    fn from_env_lookup<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        self.from_config(|_| lookup(CLIENT_KEY_ENV))
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Fetch the configured service from `registry`.
    pub fn build(&self, registry: &ClientRegistry) -> Result<Arc<dyn CatalogApi>> {
        registry.get(&self.key).ok_or_else(|| ClientError::UnknownClient {
            key: self.key.clone(),
        })
    }

    /// Fetch the configured service and connect a client to `name` at `hash`.
    pub fn connect(
        &self,
        registry: &ClientRegistry,
        name: Option<&str>,
        hash: Option<CommitHash>,
        config: ClientConfig,
    ) -> Result<Arc<CatalogClient>> {
        let api = self.build(registry)?;
        CatalogClient::connect(api, name, hash, config)
    }
}
