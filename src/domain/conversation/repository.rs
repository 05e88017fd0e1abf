//! Conversation repository trait

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::entity::{Conversation, ConversationStats, Message, MessageRole};

/// Default page size for conversation listings.
pub const DEFAULT_CONVERSATION_PAGE: u32 = 20;

/// Default maximum number of messages returned per history fetch.
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// Data access for conversations and their messages.
///
/// Implementations guarantee exactly one conversation per thread identifier
/// (get-or-create, never duplicate-insert) and that each `add_message` call
/// commits its conversation upsert, message insert and timestamp touch as a
/// unit. Errors propagate to the caller; unlike the cache layer this one does
/// not hide backend failures.
#[async_trait]
pub trait ConversationRepository: Send + Sync + Debug {
    /// Returns the conversation for `thread_id`, creating it on first use.
    ///
    /// An existing conversation is returned unchanged; `seed_title` only
    /// applies at creation, truncated per [`derive_title`].
    ///
    /// [`derive_title`]: super::entity::derive_title
    async fn get_or_create_conversation(
        &self,
        thread_id: &str,
        seed_title: Option<&str>,
    ) -> Result<Conversation, DomainError>;

    /// Appends a message, resolving or creating the owning conversation and
    /// touching its `updated_at` in the same transaction.
    async fn add_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
        tokens_used: Option<i32>,
    ) -> Result<Message, DomainError>;

    /// Messages of a thread in chronological order. Unknown threads yield an
    /// empty vec, not an error. A limit returns the most recent N messages,
    /// still oldest-first.
    async fn get_messages(
        &self,
        thread_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Message>, DomainError>;

    /// Conversations ordered most-recently-updated first, paginated.
    async fn list_conversations(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Conversation>, DomainError>;

    /// Deletes a conversation and, by cascade, its messages. Returns whether
    /// anything was deleted.
    async fn delete_conversation(&self, thread_id: &str) -> Result<bool, DomainError>;

    /// Aggregate conversation/message counts
    async fn stats(&self) -> Result<ConversationStats, DomainError>;
}
