//! Cache key derivation.
//!
//! A cache key identifies one logical call. Structurally it is
//! `[namespace:]name:digest`, or `[namespace:]explicit-key` when the caller
//! supplies the key outright. The digest is the first 16 hex characters of
//! SHA-256 over a canonical serialization of the call arguments, so
//! identical logical inputs always map to the same key and differing inputs
//! collide only with negligible probability.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Number of hex characters kept from the argument digest.
const DIGEST_LEN: usize = 16;

/// Named arguments excluded from key derivation.
///
/// These are injected handles (database connections, object-storage
/// clients) that are not part of the cached identity and may not serialize.
pub const IGNORED_ARGS: &[&str] = &["db", "s3_client", "s3_client_public", "qdrant_db"];

/// Positional and named arguments of one cached call.
///
/// Values are captured best-effort: anything serde can turn into JSON is
/// stored canonically, anything else falls back to its `Debug` rendering as
/// a string. Capture therefore never fails. The flip side is that two
/// argument sets with identical textual forms are indistinguishable.
///
/// # Examples
///
/// ```
/// use recall_cache::CallArgs;
///
/// let args = CallArgs::new()
///     .arg(&"user-42")
///     .named("page", &1)
///     .named("db", &"ignored-handle");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    positional: Vec<Value>,
    named: BTreeMap<String, Value>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg<T: Serialize + Debug>(mut self, value: &T) -> Self {
        self.positional.push(capture(value));
        self
    }

    /// Add a named argument.
    ///
    /// Arguments whose serialized value is `null` are dropped here; ignored
    /// names are filtered later, at digest time.
    pub fn named<T: Serialize + Debug>(mut self, name: &str, value: &T) -> Self {
        let value = capture(value);
        if !value.is_null() {
            self.named.insert(name.to_string(), value);
        }
        self
    }

    /// Whether any argument was captured.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

/// Canonical or best-effort JSON form of a single argument.
fn capture<T: Serialize + Debug>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|_| Value::String(format!("{value:?}")))
}

/// Short hex digest of the canonical argument serialization.
fn args_digest(args: &CallArgs) -> String {
    let named: BTreeMap<&String, &Value> = args
        .named
        .iter()
        .filter(|(name, _)| !IGNORED_ARGS.contains(&name.as_str()))
        .collect();

    // BTreeMap iteration order plus serde_json's stable rendering make the
    // raw form deterministic for a given logical input.
    let positional = serde_json::to_string(&args.positional).unwrap_or_default();
    let named = serde_json::to_string(&named).unwrap_or_default();
    let raw = format!("{positional}:{named}");

    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..DIGEST_LEN].to_string()
}

/// Derive the final cache key for one call.
///
/// An explicit key bypasses argument hashing and is used verbatim as the
/// base key. The namespace, when present, is always the first
/// colon-delimited segment of the result.
///
/// # Examples
///
/// ```
/// use recall_cache::{derive_key, CallArgs};
///
/// let key = derive_key("get_user", &CallArgs::new().arg(&42), None, Some("users"));
/// assert!(key.starts_with("users:get_user:"));
///
/// let fixed = derive_key("get_user", &CallArgs::new(), Some("pinned"), Some("users"));
/// assert_eq!(fixed, "users:pinned");
/// ```
pub fn derive_key(
    name: &str,
    args: &CallArgs,
    explicit_key: Option<&str>,
    namespace: Option<&str>,
) -> String {
    let base = match explicit_key {
        Some(key) => key.to_string(),
        None => format!("{}:{}", name, args_digest(args)),
    };

    match namespace {
        Some(ns) => format!("{ns}:{base}"),
        None => base,
    }
}
