//! Redis-backed state storage
//!
//! This module handles persistence of state documents using Redis,
//! including serialization, deserialization and expiration.

use async_trait::async_trait;
use redis::AsyncCommands;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::RedisConfig;
use crate::utils::errors::Result;
use super::storage::Storage;

/// Redis-based state storage
#[derive(Clone)]
pub struct RedisStorage {
    /// Redis connection manager
    connection_manager: redis::aio::ConnectionManager,
    /// Redis configuration
    config: RedisConfig,
}

impl RedisStorage {
    /// Create a new Redis storage instance
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
        })
    }

    /// Get the Redis key for a state document
    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.config.prefix, key)
    }

    /// Test Redis connection
    pub async fn test_connection(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for RedisStorage {
    async fn read(&self, key: &str) -> Result<Option<Value>> {
        let full_key = self.full_key(key);
        let mut conn = self.connection_manager.clone();

        let serialized: Option<String> = match conn.get::<_, Option<String>>(&full_key).await {
            Ok(data) => data,
            Err(e) => {
                error!(key = %full_key, error = %e, "Failed to read state from Redis");
                return Err(e.into());
            }
        };

        match serialized {
            Some(data) => {
                debug!(key = %full_key, data_length = data.len(), "State loaded from Redis");
                Ok(Some(serde_json::from_str(&data)?))
            }
            None => {
                debug!(key = %full_key, "No state found in Redis");
                Ok(None)
            }
        }
    }

    async fn write(&self, key: &str, value: Value) -> Result<()> {
        let full_key = self.full_key(key);
        let serialized = serde_json::to_string(&value)?;
        let mut conn = self.connection_manager.clone();

        match conn
            .set_ex::<_, _, ()>(&full_key, serialized, self.config.ttl_seconds)
            .await
        {
            Ok(_) => {
                debug!(key = %full_key, ttl_seconds = self.config.ttl_seconds, "State saved to Redis");
                Ok(())
            }
            Err(e) => {
                error!(key = %full_key, error = %e, "Failed to save state to Redis");
                Err(e.into())
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let full_key = self.full_key(key);
        let mut conn = self.connection_manager.clone();

        let deleted: u32 = conn.del(&full_key).await?;
        if deleted > 0 {
            info!(key = %full_key, "Deleted state document");
        }

        Ok(())
    }
}

impl std::fmt::Debug for RedisStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStorage")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
