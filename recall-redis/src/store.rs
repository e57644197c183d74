//! Redis-backed cache store.

use crate::config::RedisConfig;
use crate::error::{RedisError, Result};
use async_trait::async_trait;
use recall_cache::{CacheError, CacheHandle, CacheResult, CacheStore};
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use std::time::Duration;
use tracing::{error, info};

/// Key read by the startup probe.
const PROBE_KEY: &str = "recall:probe";

/// Redis cache store over a multiplexed connection manager.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    config: RedisConfig,
}

impl RedisStore {
    /// Connect to Redis.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use recall_redis::{RedisConfig, RedisStore};
    ///
    /// #[tokio::main]
    /// async fn main() -> recall_redis::Result<()> {
    ///     let store = RedisStore::connect(RedisConfig::new("redis://localhost:6379")).await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn connect(config: RedisConfig) -> Result<Self> {
        let client = Client::open(config.connection_url())
            .map_err(|e| RedisError::Connection(e.to_string()))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| RedisError::Connection(e.to_string()))?;

        Ok(Self { connection, config })
    }

    /// One exploratory read, verifying the store answers commands.
    pub async fn probe(&self) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: Option<String> = conn.get(self.build_key(PROBE_KEY)).await?;
        Ok(())
    }

    /// Get the configuration.
    pub fn config(&self) -> &RedisConfig {
        &self.config
    }

    /// Get the underlying connection manager.
    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    /// Build the full key with prefix.
    fn build_key(&self, key: &str) -> String {
        self.config.build_key(key)
    }
}

/// Map a client error into the core taxonomy.
fn store_err(err: redis::RedisError) -> CacheError {
    if err.is_timeout() {
        CacheError::Timeout
    } else if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
        CacheError::Connection(err.to_string())
    } else {
        CacheError::Store(err.to_string())
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get_json(&self, key: &str) -> CacheResult<Option<String>> {
        let key = self.build_key(key);
        let mut conn = self.connection.clone();

        let value: Option<String> = conn.get(&key).await.map_err(store_err)?;
        Ok(value)
    }

    async fn set_json(&self, key: &str, value: String, ttl: Option<Duration>) -> CacheResult<()> {
        let key = self.build_key(key);
        let mut conn = self.connection.clone();

        if let Some(ttl) = ttl {
            let ttl_seconds = ttl.as_secs();
            let _: () = conn.set_ex(&key, value, ttl_seconds).await.map_err(store_err)?;
        } else {
            let _: () = conn.set(&key, value).await.map_err(store_err)?;
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let key = self.build_key(key);
        let mut conn = self.connection.clone();
        let _: () = conn.del(&key).await.map_err(store_err)?;
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> CacheResult<Vec<String>> {
        // TODO: move to SCAN/MATCH; KEYS walks the whole keyspace in one
        // blocking pass on the server.
        let pattern = self.build_key(pattern);
        let mut conn = self.connection.clone();

        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(&pattern)
            .query_async(&mut conn)
            .await
            .map_err(store_err)?;

        Ok(keys
            .into_iter()
            .map(|key| self.config.strip_key(&key))
            .collect())
    }

    async fn clear(&self) -> CacheResult<()> {
        // Flushes the whole logical database, key prefix or not.
        let mut conn = self.connection.clone();
        let _: () = redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(store_err)?;
        Ok(())
    }
}

/// Connect and probe, yielding a handle for dependency injection.
///
/// Never fails: on any connection or probe error the returned handle is
/// disabled, every cached call runs uncached, and every invalidation is a
/// no-op.
///
/// # Examples
///
/// ```no_run
/// use recall_redis::{initialize, RedisConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let handle = initialize(RedisConfig::from_env().build()).await;
///     if !handle.is_available() {
///         // Running without caching; nothing else to do.
///     }
/// }
/// ```
pub async fn initialize(config: RedisConfig) -> CacheHandle {
    match RedisStore::connect(config).await {
        Ok(store) => match store.probe().await {
            Ok(()) => {
                info!("redis cache connected");
                CacheHandle::from_store(store)
            }
            Err(err) => {
                error!("redis is unreachable, running without cache: {}", err);
                CacheHandle::disabled()
            }
        },
        Err(err) => {
            error!("redis initialization failed: {}", err);
            CacheHandle::disabled()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_with_invalid_url_disables_the_handle() {
        let handle = initialize(RedisConfig::new("not a redis url")).await;
        assert!(!handle.is_available());
    }

    // The remaining tests require a Redis instance on localhost:6379.
    // Run with: cargo test -- --ignored

    #[tokio::test]
    #[ignore]
    async fn test_round_trip() {
        let config = RedisConfig::builder().key_prefix("recall-test").build();
        let store = RedisStore::connect(config).await.unwrap();

        store
            .set_json("rt", "\"value\"".to_string(), Some(Duration::from_secs(30)))
            .await
            .unwrap();
        assert_eq!(
            store.get_json("rt").await.unwrap(),
            Some("\"value\"".to_string())
        );

        store.delete("rt").await.unwrap();
        assert_eq!(store.get_json("rt").await.unwrap(), None);
    }

    #[tokio::test]
    #[ignore]
    async fn test_keys_strip_the_store_prefix() {
        let config = RedisConfig::builder().key_prefix("recall-test").build();
        let store = RedisStore::connect(config).await.unwrap();

        store
            .set_json("ns:a", "1".to_string(), Some(Duration::from_secs(30)))
            .await
            .unwrap();
        store
            .set_json("ns:b", "2".to_string(), Some(Duration::from_secs(30)))
            .await
            .unwrap();

        let mut keys = store.keys("ns:*").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["ns:a".to_string(), "ns:b".to_string()]);

        store.delete_many(&["ns:a", "ns:b"]).await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn test_initialize_against_live_redis() {
        let handle = initialize(RedisConfig::default()).await;
        assert!(handle.is_available());
    }
}
