//! Repository layer: Store contracts and their SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity.
//! - Isolate SQL and column encoding from service orchestration.
//! - Report semantic failures (`NotFound`, `DuplicateCompletion`,
//!   `Constraint`) apart from transport errors.
//!
//! # Invariants
//! - Every query is scoped by owner; rows of other owners are invisible.
//! - Timestamps are stored as UTC epoch milliseconds, dates as `YYYY-MM-DD`.
//! - Read paths reject undecodable rows instead of masking them.

use crate::db::DbError;
use crate::model::ValidationError;
use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod conversation_repo;
pub mod event_repo;
pub mod habit_repo;
pub mod journal_repo;
pub mod note_repo;
pub mod plan_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Store failure shared by every repository.
#[derive(Debug)]
pub enum RepoError {
    /// Entity rejected before reaching SQL.
    Validation(ValidationError),
    /// Connection, lock, I/O or other SQLite transport failure.
    Db(DbError),
    /// No row with this id for this owner.
    NotFound(Uuid),
    /// The habit already has a completion row for this UTC day.
    DuplicateCompletion { habit: Uuid, day: NaiveDate },
    /// SQLite refused a write through a CHECK/UNIQUE/FOREIGN KEY rule.
    Constraint(String),
    /// A stored value could not be decoded.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::DuplicateCompletion { habit, day } => {
                write!(f, "habit {habit} already completed on {day}")
            }
            Self::Constraint(message) => write!(f, "constraint violation: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => Self::Constraint(value.to_string()),
            _ => Self::Db(DbError::Sqlite(value)),
        }
    }
}

/// Drops sub-millisecond precision so a returned entity equals its re-read.
pub(crate) fn stored_instant(value: DateTime<Utc>) -> DateTime<Utc> {
    value.trunc_subsecs(3)
}

pub(crate) fn to_millis(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

pub(crate) fn from_millis(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| {
        RepoError::InvalidData(format!("timestamp `{value}` out of range in {column}"))
    })
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn format_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

pub(crate) fn parse_day(value: &str, column: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{value}` in {column}")))
}

#[cfg(test)]
mod tests {
    use super::{from_millis, parse_day, stored_instant, to_millis, RepoError};
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn millis_roundtrip_keeps_precision() {
        let instant = Utc.timestamp_millis_opt(1_714_953_600_123).unwrap();
        assert_eq!(from_millis(to_millis(instant), "t").unwrap(), instant);
    }

    #[test]
    fn stored_instant_matches_millis_roundtrip() {
        let instant = Utc.timestamp_nanos(1_714_953_600_123_456_789);
        let stored = stored_instant(instant);
        assert_eq!(stored, Utc.timestamp_millis_opt(1_714_953_600_123).unwrap());
        assert_eq!(from_millis(to_millis(instant), "t").unwrap(), stored);

        let before_epoch = Utc.timestamp_nanos(-1_500_000);
        assert_eq!(
            from_millis(to_millis(before_epoch), "t").unwrap(),
            stored_instant(before_epoch)
        );
    }

    #[test]
    fn undecodable_values_are_invalid_data() {
        assert!(matches!(
            from_millis(i64::MAX, "habits.created_at"),
            Err(RepoError::InvalidData(_))
        ));
        assert!(matches!(
            parse_day("2024-13-01", "calendar_events.event_date"),
            Err(RepoError::InvalidData(_))
        ));
        assert_eq!(
            parse_day("2024-02-29", "d").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }
}
