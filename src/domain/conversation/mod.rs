//! Conversation domain - durable chat history entities and repository contract

mod entity;
mod repository;

pub use entity::{
    derive_title, validate_thread_id, Conversation, ConversationStats, Message, MessageRole,
    DEFAULT_TITLE, MAX_THREAD_ID_LEN, MAX_TITLE_LEN,
};
pub use repository::{
    ConversationRepository, DEFAULT_CONVERSATION_PAGE, DEFAULT_HISTORY_LIMIT,
};
