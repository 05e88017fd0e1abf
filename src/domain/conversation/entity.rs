//! Conversation and message entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Maximum length of a caller-supplied thread identifier.
pub const MAX_THREAD_ID_LEN: usize = 100;

/// Derived titles are truncated to this many characters.
pub const MAX_TITLE_LEN: usize = 100;

/// Title used when a conversation is created without a seed.
pub const DEFAULT_TITLE: &str = "New conversation";

/// A chat session, unique per caller-supplied thread identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub thread_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single message within a conversation. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub role: MessageRole,
    pub content: String,
    pub tokens_used: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Who sent a message. Closed set; anything else is rejected at the parse
/// boundary before a backend is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MessageRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            "system" => Ok(MessageRole::System),
            other => Err(DomainError::validation(format!(
                "Invalid message role '{}'. Valid roles: user, assistant, system",
                other
            ))),
        }
    }
}

/// Aggregate counts for monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationStats {
    pub total_conversations: u64,
    pub total_messages: u64,
}

/// Derives a conversation title from an optional seed (the first user
/// message), truncated on a char boundary.
pub fn derive_title(seed: Option<&str>) -> String {
    match seed.map(str::trim).filter(|s| !s.is_empty()) {
        Some(seed) => seed.chars().take(MAX_TITLE_LEN).collect(),
        None => DEFAULT_TITLE.to_string(),
    }
}

/// Validates a caller-supplied thread identifier before any backend call.
pub fn validate_thread_id(thread_id: &str) -> Result<(), DomainError> {
    if thread_id.trim().is_empty() {
        return Err(DomainError::validation("thread_id must not be empty"));
    }

    if thread_id.chars().count() > MAX_THREAD_ID_LEN {
        return Err(DomainError::validation(format!(
            "thread_id must be at most {} characters",
            MAX_THREAD_ID_LEN
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_round_trip() {
        for role in [MessageRole::User, MessageRole::Assistant, MessageRole::System] {
            assert_eq!(MessageRole::from_str(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn test_role_rejects_unknown_values() {
        assert!(MessageRole::from_str("moderator").is_err());
        assert!(MessageRole::from_str("User").is_err());
        assert!(MessageRole::from_str("").is_err());
    }

    #[test]
    fn test_derive_title_from_seed() {
        assert_eq!(derive_title(Some("What is Python?")), "What is Python?");
    }

    #[test]
    fn test_derive_title_truncates_long_seeds() {
        let seed = "x".repeat(500);
        let title = derive_title(Some(&seed));
        assert_eq!(title.chars().count(), MAX_TITLE_LEN);
    }

    #[test]
    fn test_derive_title_placeholder() {
        assert_eq!(derive_title(None), DEFAULT_TITLE);
        assert_eq!(derive_title(Some("   ")), DEFAULT_TITLE);
    }

    #[test]
    fn test_validate_thread_id() {
        assert!(validate_thread_id("session-1706434208000").is_ok());
        assert!(validate_thread_id("").is_err());
        assert!(validate_thread_id("  ").is_err());
        assert!(validate_thread_id(&"t".repeat(MAX_THREAD_ID_LEN + 1)).is_err());
    }
}
