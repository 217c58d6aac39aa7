//! Calendar event commands.

use super::{parse_time, CliResult, Context};
use chrono::{NaiveDate, NaiveTime};
use clap::Subcommand;
use dailykit_core::{CalendarEvent, EventService, NewEvent, SqliteEventRepository};
use uuid::Uuid;

#[derive(Subcommand)]
pub enum EventAction {
    /// Add an event
    Add {
        /// Event title
        title: String,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        /// Time as HH:MM; omit for an all-day event
        #[arg(long, value_parser = parse_time)]
        time: Option<NaiveTime>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Events on one day (default: today, UTC)
    Day {
        /// Date as YYYY-MM-DD
        date: Option<NaiveDate>,
    },
    /// Events from today onward
    Upcoming {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Delete an event
    Rm {
        /// Event id
        id: Uuid,
    },
}

pub fn run(ctx: &Context, action: EventAction) -> CliResult {
    let service = EventService::new(SqliteEventRepository::try_new(&ctx.conn)?);

    match action {
        EventAction::Add {
            title,
            date,
            time,
            description,
        } => {
            let event = service.add_event(
                ctx.owner,
                &NewEvent {
                    title,
                    description,
                    date,
                    time,
                },
            )?;
            ctx.emit(&event, || format!("created {}", render(&event)))?;
        }
        EventAction::Day { date } => {
            let date = date.unwrap_or_else(|| service.today());
            let events = service.events_on(ctx.owner, date)?;
            ctx.emit(&events, || render_list(&events, "no events that day"))?;
        }
        EventAction::Upcoming { limit } => {
            let events = service.upcoming(ctx.owner, service.today(), limit)?;
            ctx.emit(&events, || render_list(&events, "nothing upcoming"))?;
        }
        EventAction::Rm { id } => {
            service.delete_event(ctx.owner, id)?;
            ctx.emit(&id, || format!("deleted {id}"))?;
        }
    }
    Ok(())
}

fn render_list(events: &[CalendarEvent], empty: &str) -> String {
    if events.is_empty() {
        return empty.to_string();
    }
    events.iter().map(render).collect::<Vec<_>>().join("\n")
}

fn render(event: &CalendarEvent) -> String {
    let when = match event.time {
        Some(time) => format!("{} {}", event.date, time.format("%H:%M")),
        None => format!("{} all-day", event.date),
    };
    match &event.description {
        Some(description) => format!("{when}  {} ({description})  {}", event.title, event.id),
        None => format!("{when}  {}  {}", event.title, event.id),
    }
}
