//! Wikipedia lookup domain types
//!
//! Lookups answer the agent with data even when they fail: "no results" or
//! "section not found" are answers the agent is expected to relay, not
//! errors. `LookupOutcome` keeps that distinction explicit, and only the
//! `Success` variant is ever cached.

use serde::{Deserialize, Serialize};

/// Cache namespaces for the Wikipedia lookup operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupNamespace {
    /// Topic search resolving to the best-match page summary
    Search,
    /// Section titles of a page
    Sections,
    /// Wikitext of a single named section
    SectionContent,
}

impl LookupNamespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupNamespace::Search => "search",
            LookupNamespace::Sections => "sections",
            LookupNamespace::SectionContent => "section-content",
        }
    }
}

impl std::fmt::Display for LookupNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a lookup: either the payload or a reason the agent can relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupOutcome<T> {
    Success { value: T },
    Failure { reason: String },
}

impl<T> LookupOutcome<T> {
    pub fn success(value: T) -> Self {
        Self::Success { value }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Best-match page for a search query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub title: String,
    pub summary: String,
    pub url: String,
}

/// Section titles of a page, in article order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionList {
    pub sections: Vec<String>,
}

/// Content of a single section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionContent {
    pub content: String,
}
