//! Journal (notebook) entry model.
//!
//! # Invariants
//! - A persisted entry has a non-blank title, non-blank content and one of
//!   the four known categories.
//! - Categories are stored by their lowercase name.

use crate::model::note::normalize_content;
use crate::model::{normalize_title, OwnerId, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

pub type JournalEntryId = Uuid;

/// Topic an entry is filed under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalCategory {
    #[default]
    Personal,
    Study,
    Thoughts,
    Goals,
}

impl JournalCategory {
    pub const ALL: [Self; 4] = [Self::Personal, Self::Study, Self::Thoughts, Self::Goals];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Study => "study",
            Self::Thoughts => "thoughts",
            Self::Goals => "goals",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Personal => "Personal",
            Self::Study => "Study",
            Self::Thoughts => "Thoughts",
            Self::Goals => "Goals",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Personal => "💭",
            Self::Study => "📖",
            Self::Thoughts => "🌙",
            Self::Goals => "🎯",
        }
    }
}

impl Display for JournalCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JournalCategory {
    type Err = ValidationError;

    /// Accepts the stored name in any letter case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownCategory(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: JournalEntryId,
    pub owner: OwnerId,
    pub title: String,
    pub content: String,
    pub category: JournalCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Title, body and category for a journal insert or edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalDraft {
    pub title: String,
    pub content: String,
    pub category: JournalCategory,
}

impl JournalDraft {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: JournalCategory,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category,
        }
    }

    /// # Errors
    /// - `BlankTitle` or `BlankContent` when either field trims to nothing.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            title: normalize_title(&self.title)?,
            content: normalize_content(&self.content)?,
            category: self.category,
        })
    }
}
