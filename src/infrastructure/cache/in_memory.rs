//! In-memory cache implementation

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use regex::Regex;

use crate::domain::cache::Cache;
use crate::domain::DomainError;

const DEFAULT_MAX_ENTRIES: u64 = 10_000;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Process-local cache for development and tests. Entries carry their own
/// deadline so per-key TTLs behave like the Redis backend.
#[derive(Debug, Clone)]
pub struct InMemoryCache {
    entries: MokaCache<String, CacheEntry>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(max_entries: u64) -> Self {
        Self {
            entries: MokaCache::builder().max_capacity(max_entries).build(),
        }
    }

    fn pattern_to_regex(pattern: &str) -> Result<Regex, DomainError> {
        let mut regex_pattern = String::with_capacity(pattern.len() + 2);
        regex_pattern.push('^');

        for ch in pattern.chars() {
            match ch {
                '*' => regex_pattern.push_str(".*"),
                '?' => regex_pattern.push('.'),
                other => regex_pattern.push_str(&regex::escape(&other.to_string())),
            }
        }

        regex_pattern.push('$');

        Regex::new(&regex_pattern)
            .map_err(|e| DomainError::cache(format!("Invalid key pattern '{}': {}", pattern, e)))
    }

    fn matching_keys(&self, regex: &Regex) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired() && regex.is_match(key))
            .map(|(key, _)| key.as_ref().clone())
            .collect()
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        match self.entries.get(key).await {
            Some(entry) if entry.is_expired() => {
                self.entries.invalidate(key).await;
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value)),
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let entry = CacheEntry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };

        self.entries.insert(key.to_string(), entry).await;

        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<usize, DomainError> {
        let regex = Self::pattern_to_regex(pattern)?;
        let keys = self.matching_keys(&regex);

        for key in &keys {
            self.entries.invalidate(key).await;
        }

        Ok(keys.len())
    }

    async fn count_pattern(&self, pattern: &str) -> Result<usize, DomainError> {
        let regex = Self::pattern_to_regex(pattern)?;

        Ok(self.matching_keys(&regex).len())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }

    async fn memory_used(&self) -> Result<Option<String>, DomainError> {
        Ok(None)
    }

    fn address(&self) -> Option<String> {
        Some("in-memory".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryCache::new();

        cache
            .set_raw("wiki:search:abc", "{\"title\":\"Rust\"}", Duration::from_secs(60))
            .await
            .unwrap();

        let value = cache.get_raw("wiki:search:abc").await.unwrap();
        assert_eq!(value, Some("{\"title\":\"Rust\"}".to_string()));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let cache = InMemoryCache::new();

        assert_eq!(cache.get_raw("wiki:search:nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_miss() {
        let cache = InMemoryCache::new();

        cache
            .set_raw("wiki:search:abc", "\"v\"", Duration::from_millis(10))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(cache.get_raw("wiki:search:abc").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value_and_ttl() {
        let cache = InMemoryCache::new();

        cache
            .set_raw("wiki:search:abc", "\"old\"", Duration::from_millis(10))
            .await
            .unwrap();
        cache
            .set_raw("wiki:search:abc", "\"new\"", Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(
            cache.get_raw("wiki:search:abc").await.unwrap(),
            Some("\"new\"".to_string())
        );
    }

    #[tokio::test]
    async fn test_pattern_delete_scopes_by_namespace() {
        let cache = InMemoryCache::new();

        cache
            .set_raw("wiki:search:a", "{}", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set_raw("wiki:search:b", "{}", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set_raw("wiki:sections:c", "{}", Duration::from_secs(60))
            .await
            .unwrap();

        let deleted = cache.delete_pattern("wiki:search:*").await.unwrap();
        assert_eq!(deleted, 2);

        assert_eq!(cache.get_raw("wiki:search:a").await.unwrap(), None);
        assert!(cache.get_raw("wiki:sections:c").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_count_pattern() {
        let cache = InMemoryCache::new();

        cache
            .set_raw("wiki:search:a", "{}", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set_raw("wiki:sections:b", "{}", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.count_pattern("wiki:*").await.unwrap(), 2);
        assert_eq!(cache.count_pattern("wiki:search:*").await.unwrap(), 1);
        assert_eq!(cache.count_pattern("wiki:other:*").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_pattern_does_not_match_across_literal_dots() {
        let cache = InMemoryCache::new();

        cache
            .set_raw("wiki:search:a.b", "{}", Duration::from_secs(60))
            .await
            .unwrap();

        // '.' in the pattern is literal, not a regex wildcard
        assert_eq!(cache.count_pattern("wiki:search:a.b").await.unwrap(), 1);
        assert_eq!(cache.count_pattern("wiki:search:aXb").await.unwrap(), 0);
    }
}
