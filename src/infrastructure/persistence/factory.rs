//! Storage factory for runtime backend selection

use std::sync::Arc;

use crate::domain::{ConversationRepository, DomainError};

use super::in_memory::InMemoryConversationRepository;
use super::migrations::run_conversation_migrations;
use super::postgres::{PostgresConfig, PostgresConversationRepository};

/// Supported storage backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// PostgreSQL storage configuration
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Factory for creating conversation repositories
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates a repository based on the configuration. The PostgreSQL path
    /// connects the pool and brings the schema up to date before returning.
    pub async fn create(
        config: &StorageConfig,
    ) -> Result<Arc<dyn ConversationRepository>, DomainError> {
        match config {
            StorageConfig::InMemory => {
                tracing::info!("Creating in-memory conversation repository");
                Ok(Arc::new(InMemoryConversationRepository::new()))
            }
            StorageConfig::Postgres(postgres_config) => {
                Ok(Arc::new(Self::create_postgres(postgres_config).await?))
            }
        }
    }

    /// PostgreSQL variant returning the concrete type, for callers that need
    /// access to the pool (shutdown, pool stats).
    pub async fn create_postgres(
        config: &PostgresConfig,
    ) -> Result<PostgresConversationRepository, DomainError> {
        tracing::info!("Connecting to PostgreSQL conversation store");
        let repository = PostgresConversationRepository::connect(config).await?;
        run_conversation_migrations(repository.pool()).await?;

        Ok(repository)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!(StorageType::from_str("postgres"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("PostgreSQL"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("pg"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("in-memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("sqlite"), None);
    }

    #[test]
    fn test_storage_config_reports_type() {
        assert_eq!(
            StorageConfig::in_memory().storage_type(),
            StorageType::InMemory
        );
        assert_eq!(
            StorageConfig::postgres(PostgresConfig::default()).storage_type(),
            StorageType::Postgres
        );
    }

    #[tokio::test]
    async fn test_create_in_memory() {
        let repository = StorageFactory::create(&StorageConfig::in_memory())
            .await
            .unwrap();

        let stats = repository.stats().await.unwrap();
        assert_eq!(stats.total_conversations, 0);
    }
}
