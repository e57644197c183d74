//! # Recall Redis
//!
//! Redis store adapter for Recall response caching.
//!
//! Connects a [`recall_cache::CacheStore`] implementation to a Redis
//! server over a multiplexed connection manager, and provides the startup
//! probe that decides between caching and fallback mode.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use recall_cache::{Cached, CachedConfig, CallArgs, Invalidator};
//! use recall_redis::{initialize, RedisConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     // One handle for the whole process. If Redis is unreachable the
//!     // handle comes back disabled and everything runs uncached.
//!     let handle = initialize(RedisConfig::from_env().build()).await;
//!
//!     let get_user = Cached::with_config(
//!         "get_user",
//!         handle.clone(),
//!         CachedConfig::new().with_ttl_secs(300).with_namespace("users"),
//!     );
//!
//!     let user = get_user
//!         .call(CallArgs::new().arg(&42), || async {
//!             // ...load from the database...
//!             "alice".to_string()
//!         })
//!         .await;
//!
//!     // Later, after a write:
//!     Invalidator::new(handle).invalidate_namespace("users").await;
//! }
//! ```

mod config;
mod error;
mod store;

pub use config::{RedisConfig, RedisConfigBuilder};
pub use error::{RedisError, Result};
pub use store::{initialize, RedisStore};

// Re-export redis crate for convenience
pub use redis;

/// Prelude for common imports.
///
/// ```
/// use recall_redis::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{RedisConfig, RedisConfigBuilder};
    pub use crate::error::{RedisError, Result};
    pub use crate::store::{initialize, RedisStore};
}
