//! Persisted AI-chat exchanges.
//!
//! # Responsibility
//! - Model one user message + assistant response pair.
//! - Project stored exchanges into per-day chat transcripts.
//!
//! # Invariants
//! - `message` is never blank.
//! - `keywords` are lowercase, whitespace-collapsed, unique and sorted.

use crate::model::{OwnerId, ValidationError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

pub type ExchangeId = Uuid;

/// One round trip with the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationExchange {
    pub id: ExchangeId,
    pub owner: OwnerId,
    pub message: String,
    pub response: String,
    pub context_type: Option<String>,
    pub keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ConversationExchange {
    /// Transcript lines for this exchange: user first, then assistant.
    pub fn messages(&self) -> [ChatMessage; 2] {
        [
            ChatMessage {
                role: ChatRole::User,
                text: self.message.clone(),
            },
            ChatMessage {
                role: ChatRole::Assistant,
                text: self.response.clone(),
            },
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

/// All transcript lines recorded on one UTC day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationDay {
    pub day: NaiveDate,
    pub messages: Vec<ChatMessage>,
}

/// Recording request for an exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewExchange {
    pub message: String,
    pub response: String,
    pub context_type: Option<String>,
    pub keywords: Vec<String>,
}

impl NewExchange {
    /// Rejects a blank message, drops a blank context and normalizes keywords.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        if self.message.trim().is_empty() {
            return Err(ValidationError::BlankMessage);
        }
        Ok(Self {
            message: self.message.clone(),
            response: self.response.clone(),
            context_type: self
                .context_type
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
            keywords: normalize_keywords(&self.keywords),
        })
    }
}

/// Lowercases, collapses inner whitespace, drops blanks and deduplicates.
pub fn normalize_keywords(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|keyword| {
            keyword
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase()
        })
        .filter(|keyword| !keyword.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
