use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub cache: CacheSettings,
    pub database: DatabaseSettings,
    pub wikipedia: WikipediaSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Backend: `redis`, `in_memory` or `disabled`
    pub backend: String,
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: u8,
    pub search_ttl_secs: u64,
    pub sections_ttl_secs: u64,
    pub section_content_ttl_secs: u64,
    /// Upper bound on any single cache round-trip, in milliseconds
    pub operation_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Backend: `postgres` or `in_memory`
    pub backend: String,
    pub url: String,
    pub pool_size: u32,
    pub max_overflow: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WikipediaSettings {
    pub api_url: String,
    pub rest_url: String,
    pub timeout_secs: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: "redis".to_string(),
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
            db: 0,
            search_ttl_secs: 3600,
            sections_ttl_secs: 7200,
            section_content_ttl_secs: 7200,
            operation_timeout_ms: 2000,
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            backend: "postgres".to_string(),
            url: "postgres://localhost/wiki_agent".to_string(),
            pool_size: 5,
            max_overflow: 10,
            connect_timeout_secs: 30,
        }
    }
}

impl Default for WikipediaSettings {
    fn default() -> Self {
        Self {
            api_url: "https://en.wikipedia.org/w/api.php".to_string(),
            rest_url: "https://en.wikipedia.org/api/rest_v1".to_string(),
            timeout_secs: 10,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.cache.backend, "redis");
        assert_eq!(config.cache.search_ttl_secs, 3600);
        assert_eq!(config.database.backend, "postgres");
        assert_eq!(config.database.pool_size, 5);
        assert_eq!(config.database.max_overflow, 10);
        assert!(config.wikipedia.api_url.contains("wikipedia.org"));
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"cache": {"backend": "in_memory"}, "logging": {"level": "debug"}}"#,
        )
        .unwrap();

        assert_eq!(config.cache.backend, "in_memory");
        assert_eq!(config.cache.port, 6379);
        assert_eq!(config.logging.level, "debug");
    }
}
