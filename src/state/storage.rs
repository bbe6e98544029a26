//! State storage abstraction
//!
//! User and conversation state is persisted through the [`Storage`] trait so
//! the backend can be swapped without touching the dialog code. The in-memory
//! store is the default; the Redis store lives in [`super::redis_store`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::{Settings, StorageBackend};
use crate::utils::errors::Result;
use super::redis_store::RedisStorage;

/// Key-value persistence for state documents
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the document stored under `key`
    async fn read(&self, key: &str) -> Result<Option<Value>>;

    /// Replace the document stored under `key`
    async fn write(&self, key: &str, value: Value) -> Result<()>;

    /// Remove the document stored under `key`; missing keys are not an error
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Process-local storage, lost on restart
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// All stored keys, sorted
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<Value>> {
        let value = self.entries.read().await.get(key).cloned();
        debug!(key = key, found = value.is_some(), "Memory storage read");
        Ok(value)
    }

    async fn write(&self, key: &str, value: Value) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        debug!(key = key, "Memory storage write");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let removed = self.entries.write().await.remove(key).is_some();
        debug!(key = key, removed = removed, "Memory storage delete");
        Ok(())
    }
}

/// Build the storage backend selected in the settings
pub async fn create_storage(settings: &Settings) -> Result<Arc<dyn Storage>> {
    match settings.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory state storage");
            Ok(Arc::new(MemoryStorage::new()))
        }
        StorageBackend::Redis => {
            info!(url = %settings.redis.url, "Using Redis state storage");
            let storage = RedisStorage::new(settings.redis.clone()).await?;
            storage.test_connection().await?;
            Ok(Arc::new(storage))
        }
    }
}
