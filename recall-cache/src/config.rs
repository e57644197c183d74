//! Cached-call configuration.

use std::time::Duration;

/// Configuration for one cached callable.
///
/// # Examples
///
/// ```
/// use recall_cache::CachedConfig;
/// use std::time::Duration;
///
/// let config = CachedConfig::new()
///     .with_ttl(Duration::from_secs(300))
///     .with_namespace("users");
/// ```
#[derive(Debug, Clone)]
pub struct CachedConfig {
    /// Entry time-to-live. Always nonzero; entries must expire.
    pub ttl: Duration,

    /// Explicit cache key, bypassing argument hashing.
    pub key: Option<String>,

    /// Namespace prefix partitioning keys for bulk invalidation.
    pub namespace: Option<String>,
}

impl Default for CachedConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            key: None,
            namespace: None,
        }
    }
}

impl CachedConfig {
    /// Create a configuration with the default 60-second TTL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the TTL. A zero duration is clamped to one second.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = if ttl.is_zero() {
            Duration::from_secs(1)
        } else {
            ttl
        };
        self
    }

    /// Set the TTL in whole seconds.
    pub fn with_ttl_secs(self, secs: u64) -> Self {
        self.with_ttl(Duration::from_secs(secs))
    }

    /// Set an explicit cache key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the namespace prefix.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}
