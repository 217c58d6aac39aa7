//! Action plan (kanban checklist) model.
//!
//! # Invariants
//! - A persisted plan has a non-blank title and at least one task.
//! - Task order is the order the caller supplied at creation.

use crate::model::{normalize_title, OwnerId, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PlanId = Uuid;
pub type PlanTaskId = Uuid;

/// One checklist item of an action plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanTask {
    pub id: PlanTaskId,
    pub title: String,
    pub completed: bool,
}

/// A titled checklist with a derived progress percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub id: PlanId,
    pub owner: OwnerId,
    pub title: String,
    /// Free text; empty when the caller gave none.
    pub description: String,
    pub tasks: Vec<PlanTask>,
    pub created_at: DateTime<Utc>,
}

impl ActionPlan {
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    /// Completed share of tasks as a whole percentage, rounded half up.
    ///
    /// Returns 0 for a plan without tasks.
    pub fn progress_percent(&self) -> u8 {
        let total = self.tasks.len();
        if total == 0 {
            return 0;
        }
        let completed = self.completed_count();
        let rounded = (completed * 200 + total) / (2 * total);
        u8::try_from(rounded).unwrap_or(100)
    }
}

/// Creation request for an action plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPlan {
    pub title: String,
    pub description: String,
    pub tasks: Vec<String>,
}

impl NewPlan {
    /// Trims every field and drops blank task titles.
    ///
    /// # Errors
    /// - `BlankTitle` when the plan title is blank.
    /// - `NoPlanTasks` when no task title survives trimming.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        let title = normalize_title(&self.title)?;
        let tasks: Vec<String> = self
            .tasks
            .iter()
            .map(|task| task.trim())
            .filter(|task| !task.is_empty())
            .map(str::to_string)
            .collect();
        if tasks.is_empty() {
            return Err(ValidationError::NoPlanTasks);
        }
        Ok(Self {
            title,
            description: self.description.trim().to_string(),
            tasks,
        })
    }
}
