//! In-memory cache store.

use crate::error::CacheResult;
use crate::traits::CacheStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// In-memory `CacheStore` backed by a `HashMap`.
///
/// Used by tests and by deployments that want per-process caching without a
/// remote store. Expired entries are dropped lazily on read; there is no
/// background sweeper.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    data: Arc<RwLock<HashMap<String, StoreEntry>>>,
}

#[derive(Clone)]
struct StoreEntry {
    value: String,
    expires_at: Option<tokio::time::Instant>,
}

impl StoreEntry {
    fn is_expired(&self, now: tokio::time::Instant) -> bool {
        self.expires_at.is_some_and(|exp| now > exp)
    }
}

impl InMemoryStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    pub async fn len(&self) -> usize {
        let now = tokio::time::Instant::now();
        let data = self.data.read().await;
        data.values().filter(|entry| !entry.is_expired(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Glob-style prefix match: `"ns:*"` matches every key starting `"ns:"`;
/// a pattern without `*` matches only itself.
fn pattern_matches(pattern: &str, key: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => key == pattern,
    }
}

#[async_trait]
impl CacheStore for InMemoryStore {
    async fn get_json(&self, key: &str) -> CacheResult<Option<String>> {
        let data = self.data.read().await;
        match data.get(key) {
            Some(entry) if !entry.is_expired(tokio::time::Instant::now()) => {
                Ok(Some(entry.value.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn set_json(&self, key: &str, value: String, ttl: Option<Duration>) -> CacheResult<()> {
        let expires_at = ttl.map(|d| tokio::time::Instant::now() + d);
        let entry = StoreEntry { value, expires_at };
        self.data.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.data.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> CacheResult<Vec<String>> {
        let now = tokio::time::Instant::now();
        let data = self.data.read().await;
        Ok(data
            .iter()
            .filter(|(key, entry)| !entry.is_expired(now) && pattern_matches(pattern, key))
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn clear(&self) -> CacheResult<()> {
        self.data.write().await.clear();
        Ok(())
    }
}
