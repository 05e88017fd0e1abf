//! Wikipedia Search Agent Backend
//!
//! Core of a conversational front-end over Wikipedia:
//! - Cached lookups: search, section listings and section content, memoized
//!   in a key-value backend that degrades to "always miss" when unavailable
//! - Conversation persistence: durable per-thread chat history with
//!   get-or-create conversations and transactional turn writes
//!
//! The agent loop, LLM integration and any HTTP surface live elsewhere; this
//! crate exposes the contracts they call.

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::cache::CacheKeyArgs;
use domain::lookup::{LookupNamespace, PageSummary, SectionContent, SectionList};
use domain::{ConversationRepository, DomainError};
use infrastructure::cache::{CacheConfig, CacheFactory, CacheType, RedisCacheConfig};
use infrastructure::persistence::{PostgresConfig, StorageConfig, StorageFactory, StorageType};
use infrastructure::services::{Fetched, LookupCache, LookupCacheConfig};
use infrastructure::wikipedia::{WikipediaClient, WikipediaClientConfig};

/// Process-wide wiring: one cache service, one repository, one Wikipedia
/// client, built once from configuration and injected where needed.
#[derive(Debug, Clone)]
pub struct AppContext {
    lookup_cache: LookupCache,
    repository: Arc<dyn ConversationRepository>,
    wikipedia: WikipediaClient,
    pg_pool: Option<sqlx::PgPool>,
}

impl AppContext {
    /// Builds every component from the configuration. A failing cache
    /// backend degrades to uncached lookups; a failing storage backend is
    /// an error.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let cache_config = match CacheType::from_str(&config.cache.backend) {
            Some(CacheType::Redis) => {
                let mut redis_config =
                    RedisCacheConfig::new(config.cache.host.clone(), config.cache.port)
                        .with_db(config.cache.db);
                if let Some(password) = &config.cache.password {
                    redis_config = redis_config.with_password(password.clone());
                }
                CacheConfig::redis(redis_config)
            }
            Some(CacheType::InMemory) => CacheConfig::in_memory(),
            Some(CacheType::Disabled) => CacheConfig::disabled(),
            None => {
                tracing::warn!(
                    backend = %config.cache.backend,
                    "Unknown cache backend, disabling cache"
                );
                CacheConfig::disabled()
            }
        };

        let backend = CacheFactory::create_or_disable(&cache_config).await;
        let lookup_cache = LookupCache::with_config(
            backend,
            LookupCacheConfig::default()
                .with_search_ttl(std::time::Duration::from_secs(config.cache.search_ttl_secs))
                .with_sections_ttl(std::time::Duration::from_secs(
                    config.cache.sections_ttl_secs,
                ))
                .with_section_content_ttl(std::time::Duration::from_secs(
                    config.cache.section_content_ttl_secs,
                ))
                .with_operation_timeout(std::time::Duration::from_millis(
                    config.cache.operation_timeout_ms,
                )),
        );

        // Unlike the cache, storage is a correctness concern: an unrecognized
        // backend is a configuration error, not something to degrade around.
        let storage_type = StorageType::from_str(&config.database.backend).ok_or_else(|| {
            DomainError::configuration(format!(
                "Unknown storage backend '{}'",
                config.database.backend
            ))
        })?;

        let storage_config = match storage_type {
            StorageType::Postgres => StorageConfig::postgres(
                PostgresConfig::new(config.database.url.clone())
                    .with_pool_size(config.database.pool_size)
                    .with_max_overflow(config.database.max_overflow)
                    .with_connect_timeout(config.database.connect_timeout_secs),
            ),
            StorageType::InMemory => StorageConfig::in_memory(),
        };
        tracing::info!(backend = ?storage_config.storage_type(), "Storage backend selected");

        let (repository, pg_pool): (Arc<dyn ConversationRepository>, Option<sqlx::PgPool>) =
            match &storage_config {
                StorageConfig::Postgres(postgres_config) => {
                    let repository = StorageFactory::create_postgres(postgres_config).await?;
                    let pool = repository.pool().clone();
                    (Arc::new(repository), Some(pool))
                }
                StorageConfig::InMemory => {
                    (StorageFactory::create(&storage_config).await?, None)
                }
            };

        let wikipedia = WikipediaClient::new(
            WikipediaClientConfig::default()
                .with_api_url(config.wikipedia.api_url.clone())
                .with_rest_url(config.wikipedia.rest_url.clone())
                .with_timeout(std::time::Duration::from_secs(config.wikipedia.timeout_secs)),
        )?;

        Ok(Self {
            lookup_cache,
            repository,
            wikipedia,
            pg_pool,
        })
    }

    pub fn lookup_cache(&self) -> &LookupCache {
        &self.lookup_cache
    }

    pub fn repository(&self) -> &Arc<dyn ConversationRepository> {
        &self.repository
    }

    pub fn wikipedia(&self) -> &WikipediaClient {
        &self.wikipedia
    }

    /// Connection pool when the PostgreSQL backend is active
    pub fn pg_pool(&self) -> Option<&sqlx::PgPool> {
        self.pg_pool.as_ref()
    }

    /// Cached Wikipedia search
    pub async fn search(&self, query: &str) -> Result<Fetched<PageSummary>, DomainError> {
        let args = CacheKeyArgs::new().with_arg("query", query);

        self.lookup_cache
            .get_or_fetch(LookupNamespace::Search, &args, || {
                self.wikipedia.search(query)
            })
            .await
    }

    /// Cached section listing
    pub async fn sections(&self, topic: &str) -> Result<Fetched<SectionList>, DomainError> {
        let args = CacheKeyArgs::new().with_arg("topic", topic);

        self.lookup_cache
            .get_or_fetch(LookupNamespace::Sections, &args, || {
                self.wikipedia.sections(topic)
            })
            .await
    }

    /// Cached section content
    pub async fn section_content(
        &self,
        topic: &str,
        section_title: &str,
    ) -> Result<Fetched<SectionContent>, DomainError> {
        let args = CacheKeyArgs::new()
            .with_arg("topic", topic)
            .with_arg("section", section_title);

        self.lookup_cache
            .get_or_fetch(LookupNamespace::SectionContent, &args, || {
                self.wikipedia.section_content(topic, section_title)
            })
            .await
    }

    /// Releases held resources. Safe to call once at process exit.
    pub async fn shutdown(&self) {
        if let Some(pool) = &self.pg_pool {
            tracing::info!("Closing PostgreSQL pool");
            pool.close().await;
        }
    }
}
