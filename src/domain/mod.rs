//! Domain layer - Core entities and contracts

pub mod cache;
pub mod conversation;
pub mod error;
pub mod lookup;

pub use cache::{derive_key, Cache, CacheKeyArgs};
pub use conversation::{
    Conversation, ConversationRepository, ConversationStats, Message, MessageRole,
};
pub use error::DomainError;
pub use lookup::{LookupNamespace, LookupOutcome, PageSummary, SectionContent, SectionList};
