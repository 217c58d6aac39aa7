//! Calendar event use-case service.

use crate::clock::{Clock, SystemClock};
use crate::model::event::{CalendarEvent, EventId, NewEvent};
use crate::model::OwnerId;
use crate::repo::event_repo::EventRepository;
use crate::service::{logged, ServiceResult};
use chrono::NaiveDate;
use log::info;

const MODULE: &str = "event_service";

/// Default length of the upcoming-events list.
pub const UPCOMING_DEFAULT_LIMIT: u32 = 5;

/// Use-case facade for calendar events.
pub struct EventService<R: EventRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: EventRepository, C: Clock> EventService<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Adds an event; a blank title is a `Validation` error.
    pub fn add_event(&self, owner: OwnerId, request: &NewEvent) -> ServiceResult<CalendarEvent> {
        let request = request
            .normalized()
            .map_err(logged(MODULE, "calendar_add"))?;
        let event = self
            .repo
            .insert_event(owner, &request, self.clock.now())
            .map_err(logged(MODULE, "calendar_add"))?;
        info!(
            "event=calendar_add module={MODULE} status=ok event_id={} date={}",
            event.id, event.date
        );
        Ok(event)
    }

    /// Events on `date`: all-day first, then by time of day.
    pub fn events_on(&self, owner: OwnerId, date: NaiveDate) -> ServiceResult<Vec<CalendarEvent>> {
        self.repo
            .list_events_on(owner, date)
            .map_err(logged(MODULE, "calendar_day"))
    }

    /// Up to `limit` events dated `today` or later, soonest first.
    ///
    /// `None` applies [`UPCOMING_DEFAULT_LIMIT`].
    pub fn upcoming(
        &self,
        owner: OwnerId,
        today: NaiveDate,
        limit: Option<u32>,
    ) -> ServiceResult<Vec<CalendarEvent>> {
        let limit = limit.unwrap_or(UPCOMING_DEFAULT_LIMIT);
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.repo
            .list_events_from(owner, today, limit)
            .map_err(logged(MODULE, "calendar_upcoming"))
    }

    /// Today's UTC date per the service clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }

    pub fn delete_event(&self, owner: OwnerId, id: EventId) -> ServiceResult<()> {
        self.repo
            .delete_event(owner, id)
            .map_err(logged(MODULE, "calendar_delete"))?;
        info!("event=calendar_delete module={MODULE} status=ok event_id={id}");
        Ok(())
    }
}
