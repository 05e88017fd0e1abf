//! Cache-aside service for Wikipedia lookups

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::cache::{derive_key, domain_pattern, Cache, CacheKeyArgs};
use crate::domain::lookup::{LookupNamespace, LookupOutcome};
use crate::domain::DomainError;

/// Configuration for lookup caching
#[derive(Debug, Clone)]
pub struct LookupCacheConfig {
    /// TTL for search results
    pub search_ttl: Duration,
    /// TTL for section listings
    pub sections_ttl: Duration,
    /// TTL for section content
    pub section_content_ttl: Duration,
    /// Upper bound on any single backend round-trip
    pub operation_timeout: Duration,
}

impl Default for LookupCacheConfig {
    fn default() -> Self {
        Self {
            search_ttl: Duration::from_secs(3600),
            sections_ttl: Duration::from_secs(7200),
            section_content_ttl: Duration::from_secs(7200),
            operation_timeout: Duration::from_secs(2),
        }
    }
}

impl LookupCacheConfig {
    pub fn with_search_ttl(mut self, ttl: Duration) -> Self {
        self.search_ttl = ttl;
        self
    }

    pub fn with_sections_ttl(mut self, ttl: Duration) -> Self {
        self.sections_ttl = ttl;
        self
    }

    pub fn with_section_content_ttl(mut self, ttl: Duration) -> Self {
        self.section_content_ttl = ttl;
        self
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// TTL for the given namespace
    pub fn ttl_for(&self, namespace: LookupNamespace) -> Duration {
        match namespace {
            LookupNamespace::Search => self.search_ttl,
            LookupNamespace::Sections => self.sections_ttl,
            LookupNamespace::SectionContent => self.section_content_ttl,
        }
    }
}

/// A lookup result together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub outcome: LookupOutcome<T>,
    pub from_cache: bool,
}

impl<T> Fetched<T> {
    fn cached(outcome: LookupOutcome<T>) -> Self {
        Self {
            outcome,
            from_cache: true,
        }
    }

    fn fresh(outcome: LookupOutcome<T>) -> Self {
        Self {
            outcome,
            from_cache: false,
        }
    }
}

/// Cache backend health as reported by [`LookupCache::stats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    Connected,
    Disabled,
    Error,
}

/// Snapshot of the cache backend for operational introspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub status: CacheStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    pub entries: usize,
    pub memory_used: Option<String>,
    pub search_ttl_secs: u64,
    pub sections_ttl_secs: u64,
    pub section_content_ttl_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Cache-aside layer over an optional key-value backend.
///
/// The backend is best-effort: a missing, slow or failing backend turns
/// every read into a miss and every write into a no-op, and the lookup still
/// completes against the source. The only errors this service returns are
/// payload serialization failures, which indicate a bug rather than an
/// operational condition.
#[derive(Debug, Clone)]
pub struct LookupCache {
    cache: Option<Arc<dyn Cache>>,
    config: LookupCacheConfig,
}

impl LookupCache {
    pub fn new(cache: Option<Arc<dyn Cache>>) -> Self {
        Self::with_config(cache, LookupCacheConfig::default())
    }

    pub fn with_config(cache: Option<Arc<dyn Cache>>, config: LookupCacheConfig) -> Self {
        Self { cache, config }
    }

    /// Whether a backend is attached. Even when true, operations may still
    /// degrade at call time.
    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Returns the cached outcome for `(namespace, args)` or runs `fetch` and
    /// caches a successful result under the namespace TTL.
    ///
    /// Failure outcomes are returned to the caller but never written to the
    /// backend, so a transient source error cannot be pinned for a TTL.
    pub async fn get_or_fetch<T, F, Fut>(
        &self,
        namespace: LookupNamespace,
        args: &CacheKeyArgs,
        fetch: F,
    ) -> Result<Fetched<T>, DomainError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = LookupOutcome<T>>,
    {
        let Some(cache) = &self.cache else {
            return Ok(Fetched::fresh(fetch().await));
        };

        let key = derive_key(namespace.as_str(), args);

        if let Some(raw) = self.read_entry(cache, &key).await {
            match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    tracing::debug!(%key, "Cache hit");
                    return Ok(Fetched::cached(LookupOutcome::success(value)));
                }
                Err(e) => {
                    // Stale shape from an older release; treat as a miss and
                    // let the fresh write replace it.
                    tracing::warn!(%key, error = %e, "Discarding undecodable cache entry");
                }
            }
        }

        let outcome = fetch().await;

        if let LookupOutcome::Success { value } = &outcome {
            let raw = serde_json::to_string(value).map_err(|e| {
                DomainError::serialization(format!("Failed to serialize lookup result: {}", e))
            })?;

            self.write_entry(cache, &key, &raw, self.config.ttl_for(namespace))
                .await;
        }

        Ok(Fetched::fresh(outcome))
    }

    /// Deletes every entry under the `wiki:*` key space. Returns 0 when no
    /// backend is attached or the backend fails.
    pub async fn clear(&self) -> usize {
        let Some(cache) = &self.cache else {
            return 0;
        };

        let pattern = domain_pattern();

        match self
            .bounded(cache.delete_pattern(&pattern), "delete_pattern")
            .await
        {
            Some(deleted) => {
                tracing::info!(deleted, "Cleared lookup cache");
                deleted
            }
            None => 0,
        }
    }

    /// Backend snapshot. Never errors; backend failures surface in the
    /// `status` and `error` fields.
    pub async fn stats(&self) -> CacheStats {
        let mut stats = CacheStats {
            status: CacheStatus::Disabled,
            host: None,
            entries: 0,
            memory_used: None,
            search_ttl_secs: self.config.search_ttl.as_secs(),
            sections_ttl_secs: self.config.sections_ttl.as_secs(),
            section_content_ttl_secs: self.config.section_content_ttl.as_secs(),
            error: None,
        };

        let Some(cache) = &self.cache else {
            return stats;
        };

        stats.host = cache.address();

        match self
            .bounded_result(cache.ping(), "ping")
            .await
        {
            Ok(()) => stats.status = CacheStatus::Connected,
            Err(e) => {
                stats.status = CacheStatus::Error;
                stats.error = Some(e.to_string());
                return stats;
            }
        }

        if let Some(entries) = self
            .bounded(cache.count_pattern(&domain_pattern()), "count_pattern")
            .await
        {
            stats.entries = entries;
        }

        if let Some(memory) = self.bounded(cache.memory_used(), "memory_used").await {
            stats.memory_used = memory;
        }

        stats
    }

    async fn read_entry(&self, cache: &Arc<dyn Cache>, key: &str) -> Option<String> {
        self.bounded(cache.get_raw(key), "get").await.flatten()
    }

    async fn write_entry(&self, cache: &Arc<dyn Cache>, key: &str, raw: &str, ttl: Duration) {
        if self
            .bounded(cache.set_raw(key, raw, ttl), "set")
            .await
            .is_some()
        {
            tracing::debug!(%key, ttl_secs = ttl.as_secs(), "Cached lookup result");
        }
    }

    /// Runs a backend operation under the configured timeout, flattening
    /// timeouts and backend errors into `None` after logging them.
    async fn bounded<T>(
        &self,
        operation: impl Future<Output = Result<T, DomainError>>,
        name: &str,
    ) -> Option<T> {
        match self.bounded_result(operation, name).await {
            Ok(value) => Some(value),
            Err(_) => None,
        }
    }

    async fn bounded_result<T>(
        &self,
        operation: impl Future<Output = Result<T, DomainError>>,
        name: &str,
    ) -> Result<T, DomainError> {
        match tokio::time::timeout(self.config.operation_timeout, operation).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(operation = name, error = %e, "Cache operation failed");
                Err(e)
            }
            Err(_) => {
                let e = DomainError::cache(format!(
                    "Cache operation '{}' timed out after {:?}",
                    name, self.config.operation_timeout
                ));
                tracing::warn!(operation = name, error = %e, "Cache operation timed out");
                Err(e)
            }
        }
    }
}
