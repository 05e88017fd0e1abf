//! Cache domain - key derivation and the key-value backend abstraction

mod key;
mod repository;

pub use key::{derive_key, domain_pattern, namespace_pattern, CacheKeyArgs, KEY_DOMAIN};
pub use repository::Cache;

#[cfg(test)]
pub use repository::mock::MockCache;
