//! Calendar event model.

use crate::model::{normalize_title, OwnerId, ValidationError};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type EventId = Uuid;

/// A dated appointment, optionally pinned to a time of day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    pub owner: OwnerId,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    /// `None` for all-day events.
    pub time: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
}

/// Creation request for a calendar event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

impl NewEvent {
    /// Trims the title and turns a blank description into `None`.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            title: normalize_title(&self.title)?,
            description: self
                .description
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
            date: self.date,
            time: self.time,
        })
    }
}
