//! Calendar event repository contract and SQLite implementation.
//!
//! # Invariants
//! - `event_date` is stored as `YYYY-MM-DD`, so text order is date order.
//! - `event_time` is stored as `HH:MM:SS` or NULL; NULL (all-day) sorts first.

use crate::db::ensure_tables;
use crate::model::event::{CalendarEvent, EventId, NewEvent};
use crate::model::OwnerId;
use crate::repo::{
    format_day, from_millis, parse_day, parse_uuid, stored_instant, to_millis, RepoError,
    RepoResult,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const EVENT_SELECT_SQL: &str = "SELECT
    uuid,
    owner_uuid,
    title,
    description,
    event_date,
    event_time,
    created_at
FROM calendar_events";

const EVENT_ORDER_SQL: &str = "ORDER BY event_date ASC, event_time ASC, created_at ASC, uuid ASC";

/// Store contract for calendar events.
pub trait EventRepository {
    fn insert_event(
        &self,
        owner: OwnerId,
        event: &NewEvent,
        created_at: DateTime<Utc>,
    ) -> RepoResult<CalendarEvent>;
    /// Events on exactly `date`, ordered by time of day.
    fn list_events_on(&self, owner: OwnerId, date: NaiveDate) -> RepoResult<Vec<CalendarEvent>>;
    /// Events on or after `from`, soonest first, at most `limit` rows.
    fn list_events_from(
        &self,
        owner: OwnerId,
        from: NaiveDate,
        limit: u32,
    ) -> RepoResult<Vec<CalendarEvent>>;
    fn delete_event(&self, owner: OwnerId, id: EventId) -> RepoResult<()>;
}

/// SQLite-backed calendar event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["calendar_events"])?;
        Ok(Self { conn })
    }

    fn query_events(
        &self,
        filter_sql: &str,
        bind: impl rusqlite::Params,
    ) -> RepoResult<Vec<CalendarEvent>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} {filter_sql}"))?;
        let mut rows = stmt.query(bind)?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn insert_event(
        &self,
        owner: OwnerId,
        event: &NewEvent,
        created_at: DateTime<Utc>,
    ) -> RepoResult<CalendarEvent> {
        let event = event.normalized()?;
        let created = CalendarEvent {
            id: Uuid::new_v4(),
            owner,
            title: event.title,
            description: event.description,
            date: event.date,
            time: event.time,
            created_at: stored_instant(created_at),
        };

        self.conn.execute(
            "INSERT INTO calendar_events (
                uuid,
                owner_uuid,
                title,
                description,
                event_date,
                event_time,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                created.id.to_string(),
                owner.to_string(),
                created.title.as_str(),
                created.description.as_deref(),
                format_day(created.date),
                created.time.map(format_time),
                to_millis(created_at),
            ],
        )?;

        Ok(created)
    }

    fn list_events_on(&self, owner: OwnerId, date: NaiveDate) -> RepoResult<Vec<CalendarEvent>> {
        self.query_events(
            &format!("WHERE owner_uuid = ?1 AND event_date = ?2 {EVENT_ORDER_SQL};"),
            params![owner.to_string(), format_day(date)],
        )
    }

    fn list_events_from(
        &self,
        owner: OwnerId,
        from: NaiveDate,
        limit: u32,
    ) -> RepoResult<Vec<CalendarEvent>> {
        self.query_events(
            &format!("WHERE owner_uuid = ?1 AND event_date >= ?2 {EVENT_ORDER_SQL} LIMIT ?3;"),
            params![owner.to_string(), format_day(from), i64::from(limit)],
        )
    }

    fn delete_event(&self, owner: OwnerId, id: EventId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM calendar_events WHERE uuid = ?1 AND owner_uuid = ?2;",
            params![id.to_string(), owner.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<CalendarEvent> {
    let uuid_text: String = row.get("uuid")?;
    let owner_text: String = row.get("owner_uuid")?;
    let date_text: String = row.get("event_date")?;
    let time = match row.get::<_, Option<String>>("event_time")? {
        Some(value) => Some(NaiveTime::parse_from_str(&value, "%H:%M:%S").map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid time `{value}` in calendar_events.event_time"
            ))
        })?),
        None => None,
    };

    Ok(CalendarEvent {
        id: parse_uuid(&uuid_text, "calendar_events.uuid")?,
        owner: parse_uuid(&owner_text, "calendar_events.owner_uuid")?,
        title: row.get("title")?,
        description: row.get("description")?,
        date: parse_day(&date_text, "calendar_events.event_date")?,
        time,
        created_at: from_millis(row.get("created_at")?, "calendar_events.created_at")?,
    })
}
