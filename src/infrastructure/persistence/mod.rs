//! Persistence infrastructure - conversation store implementations

mod factory;
mod in_memory;
mod migrations;
mod postgres;

pub use factory::{StorageConfig, StorageFactory, StorageType};
pub use in_memory::InMemoryConversationRepository;
pub use migrations::{
    conversation_migrations, run_conversation_migrations, Migration, PostgresMigrator,
};
pub use postgres::{PostgresConfig, PostgresConversationRepository};
