//! In-memory conversation repository

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::conversation::{
    derive_title, validate_thread_id, Conversation, ConversationStats, Message, MessageRole,
};
use crate::domain::{ConversationRepository, DomainError};

#[derive(Debug, Default)]
struct State {
    conversations: HashMap<String, Conversation>,
    messages: Vec<Message>,
    next_conversation_id: i64,
    next_message_id: i64,
}

impl State {
    fn get_or_create(&mut self, thread_id: &str, seed_title: Option<&str>) -> Conversation {
        if let Some(existing) = self.conversations.get(thread_id) {
            return existing.clone();
        }

        self.next_conversation_id += 1;
        let now = Utc::now();
        let conversation = Conversation {
            id: self.next_conversation_id,
            thread_id: thread_id.to_string(),
            title: derive_title(seed_title),
            created_at: now,
            updated_at: now,
        };

        self.conversations
            .insert(thread_id.to_string(), conversation.clone());

        conversation
    }
}

/// Mutex-guarded repository for tests and storage-less development. Matches
/// the ordering and idempotency semantics of the PostgreSQL implementation.
#[derive(Debug, Default)]
pub struct InMemoryConversationRepository {
    state: Mutex<State>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>, DomainError> {
        self.state
            .lock()
            .map_err(|_| DomainError::internal("Conversation state lock poisoned"))
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn get_or_create_conversation(
        &self,
        thread_id: &str,
        seed_title: Option<&str>,
    ) -> Result<Conversation, DomainError> {
        validate_thread_id(thread_id)?;

        Ok(self.lock()?.get_or_create(thread_id, seed_title))
    }

    async fn add_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
        tokens_used: Option<i32>,
    ) -> Result<Message, DomainError> {
        validate_thread_id(thread_id)?;

        let mut state = self.lock()?;

        let seed_title = (role == MessageRole::User).then_some(content);
        let conversation_id = state.get_or_create(thread_id, seed_title).id;

        state.next_message_id += 1;
        let message = Message {
            id: state.next_message_id,
            conversation_id,
            role,
            content: content.to_string(),
            tokens_used,
            created_at: Utc::now(),
        };

        state.messages.push(message.clone());

        if let Some(conversation) = state
            .conversations
            .values_mut()
            .find(|c| c.id == conversation_id)
        {
            conversation.updated_at = message.created_at;
        }

        Ok(message)
    }

    async fn get_messages(
        &self,
        thread_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Message>, DomainError> {
        validate_thread_id(thread_id)?;

        let state = self.lock()?;

        let Some(conversation) = state.conversations.get(thread_id) else {
            return Ok(Vec::new());
        };

        // Insertion order is already (created_at, id) ascending.
        let mut messages: Vec<Message> = state
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation.id)
            .cloned()
            .collect();

        if let Some(limit) = limit {
            let skip = messages.len().saturating_sub(limit as usize);
            messages.drain(..skip);
        }

        Ok(messages)
    }

    async fn list_conversations(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Conversation>, DomainError> {
        let state = self.lock()?;

        let mut conversations: Vec<Conversation> =
            state.conversations.values().cloned().collect();
        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));

        Ok(conversations
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn delete_conversation(&self, thread_id: &str) -> Result<bool, DomainError> {
        validate_thread_id(thread_id)?;

        let mut state = self.lock()?;

        let Some(conversation) = state.conversations.remove(thread_id) else {
            return Ok(false);
        };

        state.messages.retain(|m| m.conversation_id != conversation.id);

        Ok(true)
    }

    async fn stats(&self) -> Result<ConversationStats, DomainError> {
        let state = self.lock()?;

        Ok(ConversationStats {
            total_conversations: state.conversations.len() as u64,
            total_messages: state.messages.len() as u64,
        })
    }
}
