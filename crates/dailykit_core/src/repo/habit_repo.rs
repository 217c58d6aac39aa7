//! Habit repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist habit rows and their per-day completion markers.
//! - Enforce at-most-once completion per habit per UTC day at the Store.
//!
//! # Invariants
//! - Write paths call `Habit::validate()` before SQL mutations.
//! - A completion write inserts the `(habit, day)` marker and updates the
//!   habit row in one IMMEDIATE transaction; either both land or neither.
//! - Listing order is `created_at DESC, uuid ASC`.

use crate::db::ensure_tables;
use crate::model::habit::{Habit, HabitId, NewHabit};
use crate::model::OwnerId;
use crate::repo::{
    format_day, from_millis, parse_uuid, stored_instant, to_millis, RepoError, RepoResult,
};
use crate::streak::utc_day;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const HABIT_SELECT_SQL: &str = "SELECT
    uuid,
    owner_uuid,
    title,
    streak,
    last_completed_at,
    created_at
FROM habits";

/// Store contract for habit records.
pub trait HabitRepository {
    /// Inserts a never-completed habit and returns it with its new id.
    fn insert_habit(&self, habit: &NewHabit) -> RepoResult<Habit>;
    fn get_habit(&self, owner: OwnerId, id: HabitId) -> RepoResult<Option<Habit>>;
    /// Lists the owner's habits, newest first.
    fn list_habits(&self, owner: OwnerId) -> RepoResult<Vec<Habit>>;
    /// Persists `streak` and `last_completed_at` of an already completed habit
    /// and returns the habit as stored.
    ///
    /// Fails with `DuplicateCompletion` when a completion for the same UTC day
    /// already exists, and with `NotFound` when the habit is gone.
    fn record_completion(&self, habit: &Habit) -> RepoResult<Habit>;
    /// Hard-deletes the habit and its completion markers.
    fn delete_habit(&self, owner: OwnerId, id: HabitId) -> RepoResult<()>;
}

/// SQLite-backed habit repository.
pub struct SqliteHabitRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHabitRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["habits", "habit_completions"])?;
        Ok(Self { conn })
    }
}

impl HabitRepository for SqliteHabitRepository<'_> {
    fn insert_habit(&self, habit: &NewHabit) -> RepoResult<Habit> {
        let mut habit = habit.clone().into_habit(Uuid::new_v4());
        habit.created_at = stored_instant(habit.created_at);
        habit.validate()?;

        let created_at = to_millis(habit.created_at);
        self.conn.execute(
            "INSERT INTO habits (
                uuid,
                owner_uuid,
                title,
                streak,
                last_completed_at,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, 0, NULL, ?4, ?4);",
            params![
                habit.id.to_string(),
                habit.owner.to_string(),
                habit.title.as_str(),
                created_at,
            ],
        )?;

        Ok(habit)
    }

    fn get_habit(&self, owner: OwnerId, id: HabitId) -> RepoResult<Option<Habit>> {
        let mut stmt = self.conn.prepare(&format!(
            "{HABIT_SELECT_SQL}
             WHERE uuid = ?1
               AND owner_uuid = ?2;"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), owner.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_habit_row(row)?));
        }

        Ok(None)
    }

    fn list_habits(&self, owner: OwnerId) -> RepoResult<Vec<Habit>> {
        let mut stmt = self.conn.prepare(&format!(
            "{HABIT_SELECT_SQL}
             WHERE owner_uuid = ?1
             ORDER BY created_at DESC, uuid ASC;"
        ))?;

        let mut rows = stmt.query([owner.to_string()])?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            habits.push(parse_habit_row(row)?);
        }

        Ok(habits)
    }

    fn record_completion(&self, habit: &Habit) -> RepoResult<Habit> {
        habit.validate()?;
        let Some(completed_at) = habit.last_completed_at.map(stored_instant) else {
            return Err(RepoError::InvalidData(format!(
                "completion write for habit {} carries no timestamp",
                habit.id
            )));
        };
        let day = utc_day(completed_at);
        let completed_at_ms = to_millis(completed_at);

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let changed = tx.execute(
            "UPDATE habits
             SET
                streak = ?1,
                last_completed_at = ?2,
                updated_at = ?2
             WHERE uuid = ?3
               AND owner_uuid = ?4;",
            params![
                habit.streak,
                completed_at_ms,
                habit.id.to_string(),
                habit.owner.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(habit.id));
        }

        let inserted = tx
            .execute(
                "INSERT INTO habit_completions (habit_uuid, day, completed_at)
                 VALUES (?1, ?2, ?3);",
                params![habit.id.to_string(), format_day(day), completed_at_ms],
            )
            .map_err(RepoError::from);
        match inserted {
            Ok(_) => {}
            Err(RepoError::Constraint(_)) => {
                return Err(RepoError::DuplicateCompletion {
                    habit: habit.id,
                    day,
                });
            }
            Err(err) => return Err(err),
        }

        tx.commit()?;
        Ok(Habit {
            last_completed_at: Some(completed_at),
            ..habit.clone()
        })
    }

    fn delete_habit(&self, owner: OwnerId, id: HabitId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM habits WHERE uuid = ?1 AND owner_uuid = ?2;",
            params![id.to_string(), owner.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

impl SqliteHabitRepository<'_> {
    /// Number of completion markers stored for a habit.
    pub fn completion_count(&self, id: HabitId) -> RepoResult<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM habit_completions WHERE habit_uuid = ?1;",
            [id.to_string()],
            |row| row.get::<_, u32>(0),
        )?;
        Ok(count)
    }
}

fn parse_habit_row(row: &Row<'_>) -> RepoResult<Habit> {
    let uuid_text: String = row.get("uuid")?;
    let owner_text: String = row.get("owner_uuid")?;
    let streak: i64 = row.get("streak")?;
    let streak = u32::try_from(streak)
        .map_err(|_| RepoError::InvalidData(format!("invalid streak `{streak}` in habits.streak")))?;

    let last_completed_at = match row.get::<_, Option<i64>>("last_completed_at")? {
        Some(value) => Some(from_millis(value, "habits.last_completed_at")?),
        None => None,
    };

    let habit = Habit {
        id: parse_uuid(&uuid_text, "habits.uuid")?,
        owner: parse_uuid(&owner_text, "habits.owner_uuid")?,
        title: row.get("title")?,
        streak,
        last_completed_at,
        created_at: from_millis(row.get("created_at")?, "habits.created_at")?,
    };
    habit
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("habits row {}: {err}", habit.id)))?;
    Ok(habit)
}
