//! Cache factory for runtime backend selection

use std::sync::Arc;

use crate::domain::cache::Cache;
use crate::domain::DomainError;

use super::in_memory::InMemoryCache;
use super::redis::{RedisCache, RedisCacheConfig};

/// Supported cache backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheType {
    /// No cache; every lookup goes to the source
    Disabled,
    /// Process-local cache (for testing/development)
    InMemory,
    /// Redis cache
    Redis,
}

impl CacheType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "disabled" | "none" | "off" => Some(Self::Disabled),
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "redis" => Some(Self::Redis),
            _ => None,
        }
    }
}

/// Cache backend configuration
#[derive(Debug, Clone)]
pub enum CacheConfig {
    /// No backend
    Disabled,
    /// In-memory backend
    InMemory,
    /// Redis backend
    Redis(RedisCacheConfig),
}

impl CacheConfig {
    pub fn disabled() -> Self {
        Self::Disabled
    }

    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn redis(config: RedisCacheConfig) -> Self {
        Self::Redis(config)
    }

    pub fn cache_type(&self) -> CacheType {
        match self {
            Self::Disabled => CacheType::Disabled,
            Self::InMemory => CacheType::InMemory,
            Self::Redis(_) => CacheType::Redis,
        }
    }
}

/// Factory for creating cache instances
#[derive(Debug)]
pub struct CacheFactory;

impl CacheFactory {
    /// Creates a cache backend based on the configuration. `Ok(None)` means
    /// the cache is disabled by configuration; a Redis connection failure is
    /// returned as an error so the caller can decide to degrade.
    pub async fn create(config: &CacheConfig) -> Result<Option<Arc<dyn Cache>>, DomainError> {
        match config {
            CacheConfig::Disabled => {
                tracing::info!("Cache disabled by configuration");
                Ok(None)
            }
            CacheConfig::InMemory => {
                tracing::info!("Creating in-memory cache");
                Ok(Some(Arc::new(InMemoryCache::new())))
            }
            CacheConfig::Redis(redis_config) => {
                tracing::info!(address = %redis_config.address(), "Connecting to Redis cache");
                let cache = RedisCache::connect(redis_config.clone()).await?;
                Ok(Some(Arc::new(cache)))
            }
        }
    }

    /// Like [`create`], but a backend failure degrades to no cache instead of
    /// failing startup. This is the primary-path behavior: lookups still work
    /// without a cache, every request is a miss.
    ///
    /// [`create`]: Self::create
    pub async fn create_or_disable(config: &CacheConfig) -> Option<Arc<dyn Cache>> {
        match Self::create(config).await {
            Ok(cache) => cache,
            Err(e) => {
                tracing::warn!(
                    backend = ?config.cache_type(),
                    error = %e,
                    "Cache backend unavailable, continuing without cache"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_type_from_str() {
        assert_eq!(CacheType::from_str("redis"), Some(CacheType::Redis));
        assert_eq!(CacheType::from_str("Redis"), Some(CacheType::Redis));
        assert_eq!(CacheType::from_str("in_memory"), Some(CacheType::InMemory));
        assert_eq!(CacheType::from_str("memory"), Some(CacheType::InMemory));
        assert_eq!(CacheType::from_str("disabled"), Some(CacheType::Disabled));
        assert_eq!(CacheType::from_str("none"), Some(CacheType::Disabled));
        assert_eq!(CacheType::from_str("memcached"), None);
    }

    #[tokio::test]
    async fn test_create_disabled() {
        let cache = CacheFactory::create(&CacheConfig::disabled()).await.unwrap();
        assert!(cache.is_none());
    }

    #[tokio::test]
    async fn test_create_in_memory() {
        let cache = CacheFactory::create(&CacheConfig::in_memory()).await.unwrap();
        assert!(cache.is_some());
    }

    #[tokio::test]
    async fn test_unreachable_redis_degrades_to_none() {
        let config = CacheConfig::redis(
            RedisCacheConfig::new("127.0.0.1", 1)
                .with_connect_timeout(std::time::Duration::from_millis(100)),
        );

        let cache = CacheFactory::create_or_disable(&config).await;
        assert!(cache.is_none());
    }
}
