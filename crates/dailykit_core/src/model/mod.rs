//! Typed domain entities for habits, plans, events, notes, journal entries
//! and chat history.
//!
//! # Responsibility
//! - Define the canonical records the services hand to callers.
//! - Own input validation shared by every entity.
//!
//! # Invariants
//! - Every entity is identified by a Store-assigned UUID and scoped to one
//!   `OwnerId`.
//! - Timestamps are UTC; SQLite epoch-millisecond encoding stays in `repo`.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod conversation;
pub mod event;
pub mod habit;
pub mod journal;
pub mod note;
pub mod plan;

/// Identity of the user owning a row. Resolved outside the core.
pub type OwnerId = Uuid;

/// Caller-supplied or persisted data that breaks an entity rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is empty after trimming.
    BlankTitle,
    /// Chat message is empty after trimming.
    BlankMessage,
    /// Note or journal body is empty after trimming.
    BlankContent,
    /// Journal category name outside the known set.
    UnknownCategory(String),
    /// Date too close to the calendar limit to describe a whole day.
    DateOutOfRange(NaiveDate),
    /// Action plan has no non-blank task.
    NoPlanTasks,
    /// `streak > 0` but the habit was never completed.
    StreakWithoutCompletion { streak: u32 },
    /// Habit has a completion timestamp but a zero streak.
    CompletionWithoutStreak,
    /// The Store refused the write with a constraint violation.
    Rejected(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "title must not be blank"),
            Self::BlankMessage => write!(f, "message must not be blank"),
            Self::BlankContent => write!(f, "content must not be blank"),
            Self::UnknownCategory(value) => write!(
                f,
                "unknown category `{value}`, expected personal|study|thoughts|goals"
            ),
            Self::DateOutOfRange(day) => write!(f, "date {day} is out of range"),
            Self::NoPlanTasks => write!(f, "action plan needs at least one task"),
            Self::StreakWithoutCompletion { streak } => write!(
                f,
                "streak {streak} recorded for a habit that was never completed"
            ),
            Self::CompletionWithoutStreak => {
                write!(f, "completed habit must have a streak of at least 1")
            }
            Self::Rejected(message) => write!(f, "rejected by store: {message}"),
        }
    }
}

impl Error for ValidationError {}

/// Trims a title and rejects it when nothing is left.
pub fn normalize_title(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankTitle);
    }
    Ok(trimmed.to_string())
}
