//! Cache-aside response caching for asynchronous callables.
//!
//! Wraps any async callable with read-through/write-through caching over a
//! pluggable key-value store, plus a companion invalidation utility. Keys
//! are derived deterministically from the callable's name and arguments;
//! store outages and failures degrade every call to a plain, uncached
//! invocation.
//!
//! # Examples
//!
//! ## Caching a call
//!
//! ```
//! use recall_cache::{CacheHandle, Cached, CachedConfig, CallArgs, InMemoryStore};
//!
//! # tokio_test::block_on(async {
//! let handle = CacheHandle::from_store(InMemoryStore::new());
//!
//! let get_profile = Cached::with_config(
//!     "get_profile",
//!     handle.clone(),
//!     CachedConfig::new().with_ttl_secs(120).with_namespace("profiles"),
//! );
//!
//! // First call misses and runs the closure; the second is served from
//! // the store without running it.
//! let profile = get_profile
//!     .call(CallArgs::new().arg(&42), || async { "alice".to_string() })
//!     .await;
//! assert_eq!(profile, "alice");
//! # });
//! ```
//!
//! ## Invalidating
//!
//! ```
//! use recall_cache::{CacheHandle, InMemoryStore, Invalidator};
//!
//! # tokio_test::block_on(async {
//! let handle = CacheHandle::from_store(InMemoryStore::new());
//! let invalidator = Invalidator::new(handle);
//!
//! // One namespaced key, a whole namespace, or everything.
//! invalidator.invalidate_namespaced_key("profiles", "stale").await;
//! invalidator.invalidate_namespace("profiles").await;
//! invalidator.invalidate_all().await;
//! # });
//! ```
//!
//! ## Degrading gracefully
//!
//! ```
//! use recall_cache::{CacheHandle, Cached, CallArgs};
//!
//! # tokio_test::block_on(async {
//! // A disabled handle (e.g. the store probe failed at startup) turns
//! // every cached call into a direct invocation.
//! let cached = Cached::new("get_profile", CacheHandle::disabled());
//! let live = cached.call(CallArgs::new(), || async { 1 }).await;
//! assert_eq!(live, 1);
//! # });
//! ```

pub mod cached;
pub mod config;
pub mod error;
pub mod handle;
pub mod helpers;
pub mod invalidation;
pub mod key;
pub mod memory;
pub mod traits;

pub use cached::Cached;
pub use config::CachedConfig;
pub use error::{CacheError, CacheResult};
pub use handle::CacheHandle;
pub use invalidation::{InvalidationScope, Invalidator};
pub use key::{derive_key, CallArgs, IGNORED_ARGS};
pub use memory::InMemoryStore;
pub use traits::CacheStore;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cached::Cached;
    pub use crate::config::CachedConfig;
    pub use crate::error::{CacheError, CacheResult};
    pub use crate::handle::CacheHandle;
    pub use crate::invalidation::{InvalidationScope, Invalidator};
    pub use crate::key::{derive_key, CallArgs};
    pub use crate::memory::InMemoryStore;
    pub use crate::traits::CacheStore;
}
