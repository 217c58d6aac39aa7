//! Habit domain model.
//!
//! # Responsibility
//! - Define the habit record and the insertion request.
//! - Check the streak/last-completion pairing before persistence.
//!
//! # Invariants
//! - `streak == 0` iff `last_completed_at` is `None`.
//! - `title` is stored trimmed and is never blank.
//! - `id` is assigned by the Store and never reused.

use crate::model::{normalize_title, OwnerId, ValidationError};
use crate::streak::StreakUpdate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable habit identifier.
pub type HabitId = Uuid;

/// A recurring daily habit and its streak counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub owner: OwnerId,
    pub title: String,
    /// Consecutive UTC days with a completion, ending at `last_completed_at`.
    pub streak: u32,
    /// Only the completion operation sets this.
    pub last_completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Checks title and streak invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTitle);
        }
        match (self.streak, self.last_completed_at) {
            (0, Some(_)) => Err(ValidationError::CompletionWithoutStreak),
            (streak, None) if streak > 0 => {
                Err(ValidationError::StreakWithoutCompletion { streak })
            }
            _ => Ok(()),
        }
    }

    /// Returns a copy carrying the streak fields from `update`.
    pub fn with_update(&self, update: StreakUpdate) -> Self {
        Self {
            streak: update.streak,
            last_completed_at: Some(update.last_completed_at),
            ..self.clone()
        }
    }
}

/// Insertion request for a habit; the Store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHabit {
    pub owner: OwnerId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl NewHabit {
    /// Builds a request with a trimmed, non-blank title.
    pub fn new(
        owner: OwnerId,
        title: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            owner,
            title: normalize_title(title)?,
            created_at,
        })
    }

    /// Materializes the persisted record: streak 0, never completed.
    pub fn into_habit(self, id: HabitId) -> Habit {
        Habit {
            id,
            owner: self.owner,
            title: self.title,
            streak: 0,
            last_completed_at: None,
            created_at: self.created_at,
        }
    }
}
