//! Cache key derivation
//!
//! Keys follow the format `wiki:<namespace>:<hash>` where the hash is a
//! truncated SHA-256 of the canonical serialization of the lookup arguments.
//! Arguments are kept in a sorted map so permutations of the same argument
//! set always derive the same key.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

/// Fixed domain prefix shared by every cache key this crate writes.
pub const KEY_DOMAIN: &str = "wiki";

/// Length of the hex hash suffix in derived keys.
const HASH_LEN: usize = 16;

/// Named arguments of a lookup call, canonicalized for key derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheKeyArgs {
    components: BTreeMap<String, String>,
}

impl CacheKeyArgs {
    /// Creates an empty argument set
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named argument
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.components.insert(name.into(), value.into());
        self
    }

    /// Stable serialization: sorted `name=value` pairs joined with `&`
    fn canonical(&self) -> String {
        self.components
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Derives the cache key for a namespace and argument set.
pub fn derive_key(namespace: &str, args: &CacheKeyArgs) -> String {
    debug_assert!(!namespace.is_empty(), "cache namespace must not be empty");

    let digest = Sha256::digest(args.canonical().as_bytes());
    let hash = hex::encode(digest);

    format!("{}:{}:{}", KEY_DOMAIN, namespace, &hash[..HASH_LEN])
}

/// Glob pattern matching every key in one namespace.
pub fn namespace_pattern(namespace: &str) -> String {
    format!("{}:{}:*", KEY_DOMAIN, namespace)
}

/// Glob pattern matching every key this crate owns, across namespaces.
pub fn domain_pattern() -> String {
    format!("{}:*", KEY_DOMAIN)
}
