//! Shared handle to the backing store.

use crate::traits::CacheStore;
use std::fmt;
use std::sync::Arc;

/// Process-wide reference to the backing cache store.
///
/// Constructed once at startup and cloned into every component that caches
/// or invalidates. A handle is either *available* (wrapping a store) or
/// *disabled* (the initialization probe failed, or caching was never
/// configured). Dependents holding a disabled handle degrade to
/// pass-through behavior instead of failing.
///
/// Cloning is cheap (one `Arc` clone), and the handle is never mutated
/// after construction.
///
/// # Examples
///
/// ```
/// use recall_cache::{CacheHandle, InMemoryStore};
///
/// let handle = CacheHandle::from_store(InMemoryStore::new());
/// assert!(handle.is_available());
///
/// let fallback = CacheHandle::disabled();
/// assert!(!fallback.is_available());
/// ```
#[derive(Clone)]
pub struct CacheHandle {
    store: Option<Arc<dyn CacheStore>>,
}

impl CacheHandle {
    /// Create a handle wrapping an already-shared store.
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store: Some(store) }
    }

    /// Create a handle from a concrete store value.
    pub fn from_store<S: CacheStore + 'static>(store: S) -> Self {
        Self::new(Arc::new(store))
    }

    /// Create a disabled handle: every cached call runs uncached and every
    /// invalidation is a no-op.
    pub fn disabled() -> Self {
        Self { store: None }
    }

    /// Whether a backing store is attached.
    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    /// The underlying store, if available.
    pub fn store(&self) -> Option<&Arc<dyn CacheStore>> {
        self.store.as_ref()
    }
}

impl fmt::Debug for CacheHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheHandle")
            .field("available", &self.is_available())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;

    #[test]
    fn test_disabled_handle() {
        let handle = CacheHandle::disabled();
        assert!(!handle.is_available());
        assert!(handle.store().is_none());
    }

    #[test]
    fn test_handle_clone_shares_store() {
        let handle = CacheHandle::from_store(InMemoryStore::new());
        let clone = handle.clone();
        assert!(clone.is_available());
    }
}
