//! Cache-aside wrapper for asynchronous callables.

use crate::config::CachedConfig;
use crate::handle::CacheHandle;
use crate::helpers;
use crate::key::{derive_key, CallArgs};
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use tracing::{debug, warn};

/// Cache-aside wrapper around one logical async callable.
///
/// The wrapper derives a key from the callable's name and arguments, reads
/// through the store on every call, and writes the response back on a miss.
/// Caching is purely additive: a disabled handle or any store failure
/// degrades the call to a plain invocation, never to an error.
///
/// # Examples
///
/// ```
/// use recall_cache::{CacheHandle, Cached, CachedConfig, CallArgs, InMemoryStore};
///
/// # tokio_test::block_on(async {
/// let handle = CacheHandle::from_store(InMemoryStore::new());
/// let get_user = Cached::with_config(
///     "get_user",
///     handle,
///     CachedConfig::new().with_ttl_secs(300).with_namespace("users"),
/// );
///
/// let user = get_user
///     .call(CallArgs::new().arg(&42), || async { "alice".to_string() })
///     .await;
/// assert_eq!(user, "alice");
/// # });
/// ```
pub struct Cached {
    name: String,
    handle: CacheHandle,
    config: CachedConfig,
}

impl Cached {
    /// Wrap a callable identity with the default configuration.
    pub fn new(name: impl Into<String>, handle: CacheHandle) -> Self {
        Self::with_config(name, handle, CachedConfig::default())
    }

    /// Wrap a callable identity with an explicit configuration.
    pub fn with_config(name: impl Into<String>, handle: CacheHandle, config: CachedConfig) -> Self {
        Self {
            name: name.into(),
            handle,
            config,
        }
    }

    /// The logical name used as the key's first component after the
    /// namespace.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CachedConfig {
        &self.config
    }

    /// The key this wrapper derives for the given arguments.
    ///
    /// Useful for targeted invalidation of a single cached call.
    pub fn key_for(&self, args: &CallArgs) -> String {
        derive_key(
            &self.name,
            args,
            self.config.key.as_deref(),
            self.config.namespace.as_deref(),
        )
    }

    /// Invoke `f` through the cache.
    ///
    /// On a hit the stored response is returned and `f` never runs. On a
    /// miss `f` runs, its response is written back with the configured TTL,
    /// and the response is returned whether or not the write succeeded.
    /// Read failures (connection errors, timeouts, undecodable entries)
    /// are logged and treated as misses.
    ///
    /// Concurrent callers missing on the same key each invoke `f` and each
    /// write back independently; the last write wins.
    pub async fn call<T, F, Fut>(&self, args: CallArgs, f: F) -> T
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let Some(store) = self.handle.store() else {
            return f().await;
        };

        let key = self.key_for(&args);

        match helpers::get::<_, T>(store.as_ref(), &key).await {
            Ok(Some(hit)) => {
                debug!("cache hit for {}", key);
                return hit;
            }
            Ok(None) => {}
            Err(err) => warn!("cache read failed for {}: {}", key, err),
        }

        let response = f().await;

        if let Err(err) =
            helpers::set(store.as_ref(), &key, &response, Some(self.config.ttl)).await
        {
            warn!("cache write failed for {}: {}", key, err);
        }

        response
    }

    /// Invoke a fallible `f` through the cache.
    ///
    /// Identical to [`call`](Self::call) except that `Err` responses
    /// propagate to the caller unchanged and are never written to the
    /// store.
    pub async fn try_call<T, E, F, Fut>(&self, args: CallArgs, f: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let Some(store) = self.handle.store() else {
            return f().await;
        };

        let key = self.key_for(&args);

        match helpers::get::<_, T>(store.as_ref(), &key).await {
            Ok(Some(hit)) => {
                debug!("cache hit for {}", key);
                return Ok(hit);
            }
            Ok(None) => {}
            Err(err) => warn!("cache read failed for {}: {}", key, err),
        }

        let response = f().await?;

        if let Err(err) =
            helpers::set(store.as_ref(), &key, &response, Some(self.config.ttl)).await
        {
            warn!("cache write failed for {}: {}", key, err);
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CacheError, CacheResult};
    use crate::memory::InMemoryStore;
    use crate::traits::CacheStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Store whose every operation fails.
    struct BrokenStore;

    #[async_trait]
    impl CacheStore for BrokenStore {
        async fn get_json(&self, _key: &str) -> CacheResult<Option<String>> {
            Err(CacheError::Connection("broken pipe".to_string()))
        }

        async fn set_json(
            &self,
            _key: &str,
            _value: String,
            _ttl: Option<Duration>,
        ) -> CacheResult<()> {
            Err(CacheError::Connection("broken pipe".to_string()))
        }

        async fn delete(&self, _key: &str) -> CacheResult<()> {
            Err(CacheError::Connection("broken pipe".to_string()))
        }

        async fn keys(&self, _pattern: &str) -> CacheResult<Vec<String>> {
            Err(CacheError::Connection("broken pipe".to_string()))
        }

        async fn clear(&self) -> CacheResult<()> {
            Err(CacheError::Connection("broken pipe".to_string()))
        }
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let handle = CacheHandle::from_store(InMemoryStore::new());
        let cached = Cached::new("answer", handle);
        let calls = AtomicUsize::new(0);

        let first = cached
            .call(CallArgs::new().arg(&1), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                41 + 1
            })
            .await;
        assert_eq!(first, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let second = cached
            .call(CallArgs::new().arg(&1), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                0
            })
            .await;
        assert_eq!(second, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_args_are_different_entries() {
        let handle = CacheHandle::from_store(InMemoryStore::new());
        let cached = Cached::new("double", handle);

        let a = cached
            .call(CallArgs::new().arg(&2), || async { 4 })
            .await;
        let b = cached
            .call(CallArgs::new().arg(&3), || async { 6 })
            .await;
        assert_eq!((a, b), (4, 6));
    }

    #[tokio::test]
    async fn test_disabled_handle_invokes_every_time() {
        let cached = Cached::new("live", CacheHandle::disabled());
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cached
                .call(CallArgs::new(), || async {
                    calls.fetch_add(1, Ordering::SeqCst)
                })
                .await;
            // Always the live result, never a stale cached one.
            assert_eq!(value, calls.load(Ordering::SeqCst) - 1);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_broken_store_is_invisible() {
        let handle = CacheHandle::from_store(BrokenStore);
        let cached = Cached::new("resilient", handle);

        let value = cached
            .call(CallArgs::new().arg(&"x"), || async { "live".to_string() })
            .await;
        assert_eq!(value, "live");
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_a_miss() {
        let store = InMemoryStore::new();
        let handle = CacheHandle::from_store(store.clone());
        let cached = Cached::new("typed", handle);
        let key = cached.key_for(&CallArgs::new());

        // Poison the entry with a payload of the wrong shape.
        store
            .set_json(&key, "\"not a number\"".to_string(), None)
            .await
            .unwrap();

        let value: u32 = cached.call(CallArgs::new(), || async { 7 }).await;
        assert_eq!(value, 7);

        // The miss path overwrote the poisoned entry.
        let healed = cached.call(CallArgs::new(), || async { 0 }).await;
        assert_eq!(healed, 7);
    }

    #[tokio::test]
    async fn test_try_call_does_not_cache_errors() {
        let handle = CacheHandle::from_store(InMemoryStore::new());
        let cached = Cached::new("flaky", handle);
        let calls = AtomicUsize::new(0);

        let first: Result<String, String> = cached
            .try_call(CallArgs::new(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("upstream down".to_string())
            })
            .await;
        assert_eq!(first, Err("upstream down".to_string()));

        // The error was not cached; the next call runs and its success is.
        let second: Result<String, String> = cached
            .try_call(CallArgs::new(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("recovered".to_string())
            })
            .await;
        assert_eq!(second, Ok("recovered".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let third: Result<String, String> = cached
            .try_call(CallArgs::new(), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("never used".to_string())
            })
            .await;
        assert_eq!(third, Ok("recovered".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_explicit_key_and_namespace() {
        let handle = CacheHandle::from_store(InMemoryStore::new());
        let cached = Cached::with_config(
            "get_user",
            handle,
            CachedConfig::new().with_key("pinned").with_namespace("users"),
        );

        assert_eq!(cached.key_for(&CallArgs::new().arg(&1)), "users:pinned");
        // Explicit key: argument differences no longer separate entries.
        assert_eq!(cached.key_for(&CallArgs::new().arg(&2)), "users:pinned");
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let handle = CacheHandle::from_store(InMemoryStore::new());
        let cached = Cached::with_config(
            "clock",
            handle,
            CachedConfig::new().with_ttl(Duration::from_secs(10)),
        );
        let calls = AtomicUsize::new(0);

        let tick = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            calls.load(Ordering::SeqCst)
        };

        assert_eq!(cached.call(CallArgs::new(), tick).await, 1);
        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(cached.call(CallArgs::new(), tick).await, 1);
        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(cached.call(CallArgs::new(), tick).await, 2);
    }
}
