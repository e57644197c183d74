//! Cache store trait definition.

use crate::error::CacheResult;
use async_trait::async_trait;
use std::time::Duration;

/// Cache store trait for different cache backends.
///
/// Values are stored as JSON strings; expiry is enforced by the store
/// itself, not by callers.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a JSON value from the cache.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(value))` if the key exists, `Ok(None)` if not found,
    /// or an error if the operation fails.
    async fn get_json(&self, key: &str) -> CacheResult<Option<String>>;

    /// Set a JSON value in the cache.
    ///
    /// A `ttl` of `None` stores the value without expiry.
    async fn set_json(&self, key: &str, value: String, ttl: Option<Duration>) -> CacheResult<()>;

    /// Delete a key from the cache. Deleting an absent key is a no-op.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// List all keys matching a glob-style prefix pattern (e.g. `"ns:*"`).
    async fn keys(&self, pattern: &str) -> CacheResult<Vec<String>>;

    /// Clear all keys from the cache.
    ///
    /// **Warning:** This operation may be destructive and affect all keys.
    async fn clear(&self) -> CacheResult<()>;

    /// Delete multiple keys in parallel.
    ///
    /// One round trip per key, issued concurrently; total latency is the
    /// slowest single delete rather than the sum.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use recall_cache::*;
    /// # async fn example(cache: &impl CacheStore) -> CacheResult<()> {
    /// let keys = vec!["session:1", "session:2", "session:3"];
    /// cache.delete_many(&keys).await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn delete_many(&self, keys: &[&str]) -> CacheResult<()> {
        use futures::future::try_join_all;

        let futures = keys.iter().map(|key| self.delete(key));
        try_join_all(futures).await?;
        Ok(())
    }
}
