//! Cache trait definition

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Generic key-value cache with TTL support.
///
/// Values are raw JSON strings to keep the trait dyn-compatible; the lookup
/// cache service handles typed (de)serialization on top. Every method that
/// touches the backend returns `DomainError::Cache` on failure, which callers
/// on the primary path treat as "cache absent" rather than an error.
#[async_trait]
pub trait Cache: Send + Sync + Debug {
    /// Gets a raw JSON value from the cache
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Sets a raw JSON value with an expiry. Re-setting an existing key
    /// replaces both value and TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError>;

    /// Deletes every key matching a glob pattern, returning the count deleted
    async fn delete_pattern(&self, pattern: &str) -> Result<usize, DomainError>;

    /// Counts live keys matching a glob pattern
    async fn count_pattern(&self, pattern: &str) -> Result<usize, DomainError>;

    /// Lightweight connectivity probe
    async fn ping(&self) -> Result<(), DomainError>;

    /// Human-readable memory footprint of the backend, if it reports one
    async fn memory_used(&self) -> Result<Option<String>, DomainError>;

    /// Identity of the backend for stats reporting (`host:port` for remote
    /// backends), if it has one
    fn address(&self) -> Option<String>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock cache for testing: primed entries plus a switchable forced error
    /// for exercising the degradation paths.
    #[derive(Debug, Default)]
    pub struct MockCache {
        entries: Mutex<HashMap<String, String>>,
        error: Mutex<Option<String>>,
    }

    impl MockCache {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entry(self, key: &str, value: &str) -> Self {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        pub fn contains(&self, key: &str) -> bool {
            self.entries.lock().unwrap().contains_key(key)
        }

        pub fn len(&self) -> usize {
            self.entries.lock().unwrap().len()
        }

        fn check_error(&self) -> Result<(), DomainError> {
            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::cache(error));
            }
            Ok(())
        }

        fn glob_to_regex(pattern: &str) -> regex::Regex {
            let escaped = regex::escape(pattern).replace(r"\*", ".*");
            regex::Regex::new(&format!("^{}$", escaped)).unwrap()
        }
    }

    #[async_trait]
    impl Cache for MockCache {
        async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
            self.check_error()?;
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn set_raw(
            &self,
            key: &str,
            value: &str,
            _ttl: Duration,
        ) -> Result<(), DomainError> {
            self.check_error()?;
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn delete_pattern(&self, pattern: &str) -> Result<usize, DomainError> {
            self.check_error()?;
            let regex = Self::glob_to_regex(pattern);
            let mut entries = self.entries.lock().unwrap();

            let keys: Vec<String> = entries
                .keys()
                .filter(|k| regex.is_match(k))
                .cloned()
                .collect();

            for key in &keys {
                entries.remove(key);
            }

            Ok(keys.len())
        }

        async fn count_pattern(&self, pattern: &str) -> Result<usize, DomainError> {
            self.check_error()?;
            let regex = Self::glob_to_regex(pattern);

            Ok(self
                .entries
                .lock()
                .unwrap()
                .keys()
                .filter(|k| regex.is_match(k))
                .count())
        }

        async fn ping(&self) -> Result<(), DomainError> {
            self.check_error()
        }

        async fn memory_used(&self) -> Result<Option<String>, DomainError> {
            self.check_error()?;
            Ok(None)
        }

        fn address(&self) -> Option<String> {
            None
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_cache_set_get() {
            let cache = MockCache::new();
            cache
                .set_raw("key1", "\"value1\"", Duration::from_secs(60))
                .await
                .unwrap();

            let result = cache.get_raw("key1").await.unwrap();
            assert_eq!(result, Some("\"value1\"".to_string()));
        }

        #[tokio::test]
        async fn test_mock_cache_get_missing() {
            let cache = MockCache::new();

            let result = cache.get_raw("missing").await.unwrap();
            assert!(result.is_none());
        }

        #[tokio::test]
        async fn test_mock_cache_with_error() {
            let cache = MockCache::new().with_error("connection refused");

            assert!(cache.get_raw("key").await.is_err());
            assert!(cache.ping().await.is_err());
        }

        #[tokio::test]
        async fn test_mock_cache_pattern_ops() {
            let cache = MockCache::new()
                .with_entry("wiki:search:aaa", "{}")
                .with_entry("wiki:search:bbb", "{}")
                .with_entry("wiki:sections:ccc", "{}");

            assert_eq!(cache.count_pattern("wiki:search:*").await.unwrap(), 2);
            assert_eq!(cache.count_pattern("wiki:*").await.unwrap(), 3);

            let deleted = cache.delete_pattern("wiki:search:*").await.unwrap();
            assert_eq!(deleted, 2);
            assert_eq!(cache.count_pattern("wiki:*").await.unwrap(), 1);
        }
    }
}
