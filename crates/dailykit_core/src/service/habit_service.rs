//! Habit use-case service.
//!
//! # Responsibility
//! - Orchestrate the streak engine around habit repository calls.
//! - Never issue a completion write for a habit already completed today.
//!
//! # Invariants
//! - Every operation does one logical read or insert and at most one write.
//! - `complete_habit` is idempotent per UTC day, including when a concurrent
//!   client wins the race for the same day.
//! - Returned habits equal what a later read returns (Store precision).

use crate::clock::{Clock, SystemClock};
use crate::model::habit::{Habit, HabitId, NewHabit};
use crate::model::OwnerId;
use crate::repo::habit_repo::HabitRepository;
use crate::repo::RepoError;
use crate::service::{logged, ServiceError, ServiceResult};
use crate::streak::{compute_next_streak, is_completed_today};
use chrono::{DateTime, Utc};
use log::{debug, info};

const MODULE: &str = "habit_service";

/// Use-case facade for habits.
pub struct HabitService<R: HabitRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: HabitRepository> HabitService<R> {
    /// Creates a service reading wall-clock time.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: HabitRepository, C: Clock> HabitService<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Instant the service currently considers "now".
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Lists the owner's habits, most recently created first.
    pub fn list_habits(&self, owner: OwnerId) -> ServiceResult<Vec<Habit>> {
        self.repo
            .list_habits(owner)
            .map_err(logged(MODULE, "habit_list"))
    }

    /// Creates a habit with streak 0 and no completion.
    ///
    /// # Errors
    /// - `Validation` when `title` is blank; nothing is persisted.
    pub fn create_habit(&self, owner: OwnerId, title: &str) -> ServiceResult<Habit> {
        let request = NewHabit::new(owner, title, self.clock.now())
            .map_err(logged(MODULE, "habit_create"))?;
        let habit = self
            .repo
            .insert_habit(&request)
            .map_err(logged(MODULE, "habit_create"))?;
        info!(
            "event=habit_create module={MODULE} status=ok habit_id={}",
            habit.id
        );
        Ok(habit)
    }

    /// Marks the habit done for today and returns its resulting state.
    ///
    /// A habit already completed today is returned unchanged without a write.
    ///
    /// # Errors
    /// - `NotFound` when the habit does not exist for `owner`.
    /// - `TransientStore` when the Store fails; the streak is left untouched.
    pub fn complete_habit(&self, owner: OwnerId, id: HabitId) -> ServiceResult<Habit> {
        let habit = self.load(owner, id)?;

        let now = self.clock.now();
        if is_completed_today(&habit, now) {
            debug!(
                "event=habit_complete module={MODULE} status=noop habit_id={} streak={}",
                id, habit.streak
            );
            return Ok(habit);
        }

        let completed = habit.with_update(compute_next_streak(&habit, now));
        match self.repo.record_completion(&completed) {
            Ok(stored) => {
                info!(
                    "event=habit_complete module={MODULE} status=ok habit_id={} streak={}",
                    id, stored.streak
                );
                Ok(stored)
            }
            Err(RepoError::DuplicateCompletion { .. }) => {
                // Another writer completed it for this day first.
                debug!(
                    "event=habit_complete module={MODULE} status=noop habit_id={} reason=duplicate_day",
                    id
                );
                self.load(owner, id)
            }
            Err(err) => Err(logged(MODULE, "habit_complete")(err)),
        }
    }

    /// Permanently deletes a habit.
    ///
    /// # Errors
    /// - `NotFound` when no such habit exists for `owner`.
    pub fn delete_habit(&self, owner: OwnerId, id: HabitId) -> ServiceResult<()> {
        self.repo
            .delete_habit(owner, id)
            .map_err(logged(MODULE, "habit_delete"))?;
        info!("event=habit_delete module={MODULE} status=ok habit_id={id}");
        Ok(())
    }

    fn load(&self, owner: OwnerId, id: HabitId) -> ServiceResult<Habit> {
        self.repo
            .get_habit(owner, id)
            .map_err(ServiceError::from)
            .and_then(|habit| habit.ok_or(ServiceError::NotFound(id)))
            .map_err(logged(MODULE, "habit_complete"))
    }
}
