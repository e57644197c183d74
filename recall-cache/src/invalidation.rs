//! Key and namespace invalidation.

use crate::error::CacheResult;
use crate::handle::CacheHandle;
use crate::traits::CacheStore;
use tracing::{debug, warn};

/// Which entries an invalidation removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidationScope {
    /// One literal key.
    Key(String),
    /// One key under a namespace: deletes `"{namespace}:{key}"`.
    KeyInNamespace { namespace: String, key: String },
    /// Every key under a namespace prefix.
    Namespace(String),
    /// The entire store.
    All,
}

impl InvalidationScope {
    /// Dispatch on which of `key` and `namespace` are present:
    ///
    /// | key | namespace | scope |
    /// |-----|-----------|-------|
    /// | set | set | [`KeyInNamespace`](Self::KeyInNamespace) |
    /// | set | absent | [`Key`](Self::Key) |
    /// | absent | set | [`Namespace`](Self::Namespace) |
    /// | absent | absent | [`All`](Self::All) |
    pub fn from_parts(key: Option<&str>, namespace: Option<&str>) -> Self {
        match (key, namespace) {
            (Some(key), Some(namespace)) => Self::KeyInNamespace {
                namespace: namespace.to_string(),
                key: key.to_string(),
            },
            (Some(key), None) => Self::Key(key.to_string()),
            (None, Some(namespace)) => Self::Namespace(namespace.to_string()),
            (None, None) => Self::All,
        }
    }
}

/// Removes cached entries by key, by namespace, or wholesale.
///
/// Invalidation never fails from the caller's perspective: a disabled
/// handle makes every call a silent no-op, and store errors are logged and
/// discarded.
///
/// # Examples
///
/// ```
/// use recall_cache::{CacheHandle, InMemoryStore, Invalidator};
///
/// # tokio_test::block_on(async {
/// let handle = CacheHandle::from_store(InMemoryStore::new());
/// let invalidator = Invalidator::new(handle);
///
/// invalidator.invalidate_namespace("users").await;
/// # });
/// ```
pub struct Invalidator {
    handle: CacheHandle,
}

impl Invalidator {
    pub fn new(handle: CacheHandle) -> Self {
        Self { handle }
    }

    /// Remove the entries selected by `scope`.
    pub async fn invalidate(&self, scope: InvalidationScope) {
        let Some(store) = self.handle.store() else {
            return;
        };

        let result = match &scope {
            InvalidationScope::Key(key) => store.delete(key).await,
            InvalidationScope::KeyInNamespace { namespace, key } => {
                store.delete(&format!("{namespace}:{key}")).await
            }
            InvalidationScope::Namespace(namespace) => {
                invalidate_prefix(store.as_ref(), namespace).await
            }
            InvalidationScope::All => store.clear().await,
        };

        if let Err(err) = result {
            warn!("invalidation failed for {:?}: {}", scope, err);
        }
    }

    /// Delete one literal key.
    pub async fn invalidate_key(&self, key: &str) {
        self.invalidate(InvalidationScope::Key(key.to_string()))
            .await;
    }

    /// Delete `"{namespace}:{key}"`.
    pub async fn invalidate_namespaced_key(&self, namespace: &str, key: &str) {
        self.invalidate(InvalidationScope::KeyInNamespace {
            namespace: namespace.to_string(),
            key: key.to_string(),
        })
        .await;
    }

    /// Delete every key under `"{namespace}:"`.
    pub async fn invalidate_namespace(&self, namespace: &str) {
        self.invalidate(InvalidationScope::Namespace(namespace.to_string()))
            .await;
    }

    /// Clear the entire store.
    pub async fn invalidate_all(&self) {
        self.invalidate(InvalidationScope::All).await;
    }
}

/// Enumerate-then-delete for one namespace.
///
/// Not atomic: a key written under the namespace after enumeration survives
/// this invalidation.
async fn invalidate_prefix(store: &dyn CacheStore, namespace: &str) -> CacheResult<()> {
    let keys = store.keys(&format!("{namespace}:*")).await?;
    debug!("invalidating {} keys under namespace {}", keys.len(), namespace);

    let refs: Vec<&str> = keys.iter().map(|key| key.as_str()).collect();
    store.delete_many(&refs).await
}
