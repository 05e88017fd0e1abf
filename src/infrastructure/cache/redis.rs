//! Redis cache implementation

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::cache::Cache;
use crate::domain::DomainError;

/// Configuration for the Redis cache backend
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis host
    pub host: String,
    /// Redis port
    pub port: u16,
    /// Optional password
    pub password: Option<String>,
    /// Database index
    pub db: u8,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
            db: 0,
            connect_timeout: Duration::from_secs(2),
        }
    }
}

impl RedisCacheConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_db(mut self, db: u8) -> Self {
        self.db = db;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Connection URL in the form `redis://[:password@]host:port/db`
    pub fn url(&self) -> String {
        match &self.password {
            Some(password) => format!(
                "redis://:{}@{}:{}/{}",
                password, self.host, self.port, self.db
            ),
            None => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }

    /// `host:port` for stats reporting
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Redis cache backed by a `ConnectionManager`, which multiplexes a single
/// reconnecting connection across concurrent callers.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("address", &self.config.address())
            .field("db", &self.config.db)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCache {
    /// Connects to Redis, bounded by the configured connect timeout.
    pub async fn connect(config: RedisCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| {
                DomainError::cache(format!(
                    "Timed out connecting to Redis at {}",
                    config.address()
                ))
            })?
            .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self { connection, config })
    }

    async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>, DomainError> {
        let mut conn = self.connection.clone();
        let mut cursor = 0u64;
        let mut keys = Vec::new();

        loop {
            let (new_cursor, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    DomainError::cache(format!(
                        "Failed to scan keys with pattern '{}': {}",
                        pattern, e
                    ))
                })?;

            keys.extend(batch);
            cursor = new_cursor;

            if cursor == 0 {
                break;
            }
        }

        Ok(keys)
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        let mut conn = self.connection.clone();

        let result: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to get key '{}': {}", key, e)))?;

        Ok(result)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();
        let ttl_secs = ttl.as_secs().max(1);

        let _: () = conn
            .set_ex(key, value, ttl_secs)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to set key '{}': {}", key, e)))?;

        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<usize, DomainError> {
        let keys = self.scan_keys(pattern).await?;

        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.connection.clone();
        let deleted: usize = conn
            .del(&keys)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to delete keys: {}", e)))?;

        Ok(deleted)
    }

    async fn count_pattern(&self, pattern: &str) -> Result<usize, DomainError> {
        Ok(self.scan_keys(pattern).await?.len())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::cache(format!("Redis ping failed: {}", e)))?;

        Ok(())
    }

    async fn memory_used(&self) -> Result<Option<String>, DomainError> {
        let mut conn = self.connection.clone();

        let info: String = redis::cmd("INFO")
            .arg("memory")
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to read memory info: {}", e)))?;

        Ok(parse_used_memory(&info))
    }

    fn address(&self) -> Option<String> {
        Some(self.config.address())
    }
}

fn parse_used_memory(info: &str) -> Option<String> {
    info.lines()
        .find_map(|line| line.strip_prefix("used_memory_human:"))
        .map(|v| v.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait-level behavior is covered against InMemoryCache and MockCache;
    // these tests require a running Redis instance.

    fn get_test_config() -> RedisCacheConfig {
        RedisCacheConfig::default().with_connect_timeout(Duration::from_secs(1))
    }

    #[test]
    fn test_url_without_password() {
        let config = RedisCacheConfig::new("cache.internal", 6380).with_db(2);
        assert_eq!(config.url(), "redis://cache.internal:6380/2");
        assert_eq!(config.address(), "cache.internal:6380");
    }

    #[test]
    fn test_url_with_password() {
        let config = RedisCacheConfig::default().with_password("hunter2");
        assert_eq!(config.url(), "redis://:hunter2@127.0.0.1:6379/0");
    }

    #[test]
    fn test_parse_used_memory() {
        let info = "# Memory\r\nused_memory:1048576\r\nused_memory_human:1.00M\r\n";
        assert_eq!(parse_used_memory(info), Some("1.00M".to_string()));
        assert_eq!(parse_used_memory("# Memory\r\n"), None);
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_set_and_get() {
        let cache = RedisCache::connect(get_test_config()).await.unwrap();

        cache
            .set_raw("wiki:test:key1", "\"value1\"", Duration::from_secs(60))
            .await
            .unwrap();

        let result = cache.get_raw("wiki:test:key1").await.unwrap();
        assert_eq!(result, Some("\"value1\"".to_string()));

        // Cleanup
        cache.delete_pattern("wiki:test:*").await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_pattern_count_and_delete() {
        let cache = RedisCache::connect(get_test_config()).await.unwrap();

        cache
            .set_raw("wiki:test:a", "{}", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set_raw("wiki:test:b", "{}", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.count_pattern("wiki:test:*").await.unwrap(), 2);
        assert_eq!(cache.delete_pattern("wiki:test:*").await.unwrap(), 2);
        assert_eq!(cache.count_pattern("wiki:test:*").await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_ping_and_memory() {
        let cache = RedisCache::connect(get_test_config()).await.unwrap();

        cache.ping().await.unwrap();
        assert!(cache.memory_used().await.unwrap().is_some());
        assert_eq!(cache.address(), Some("127.0.0.1:6379".to_string()));
    }
}
