use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use dailykit_core::db::open_db_in_memory;
use dailykit_core::{
    EventService, ManualClock, NewEvent, ServiceError, SqliteEventRepository, ValidationError,
};
use uuid::Uuid;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
}

fn at(h: u32, m: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, 0)
}

fn event(title: &str, date: NaiveDate, time: Option<NaiveTime>) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        description: None,
        date,
        time,
    }
}

#[test]
fn events_on_day_put_all_day_first_then_by_time() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());
    let owner = Uuid::new_v4();

    service.add_event(owner, &event("Dentist", day(10), at(14, 30))).unwrap();
    service.add_event(owner, &event("Standup", day(10), at(9, 15))).unwrap();
    service.add_event(owner, &event("Holiday", day(10), None)).unwrap();
    service.add_event(owner, &event("Elsewhere", day(11), at(8, 0))).unwrap();

    let titles: Vec<String> = service
        .events_on(owner, day(10))
        .unwrap()
        .into_iter()
        .map(|event| event.title)
        .collect();
    assert_eq!(titles, vec!["Holiday", "Standup", "Dentist"]);
}

#[test]
fn add_event_trims_fields_and_round_trips_time() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());
    let owner = Uuid::new_v4();

    let created = service
        .add_event(
            owner,
            &NewEvent {
                title: "  Review ".to_string(),
                description: Some("   ".to_string()),
                date: day(3),
                time: at(16, 45),
            },
        )
        .unwrap();
    assert_eq!(created.title, "Review");
    assert_eq!(created.description, None);

    let stored = service.events_on(owner, day(3)).unwrap();
    assert_eq!(stored, vec![created]);

    assert!(matches!(
        service.add_event(owner, &event(" ", day(3), None)),
        Err(ServiceError::Validation(ValidationError::BlankTitle))
    ));
}

#[test]
fn upcoming_starts_today_and_honors_limit() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 7, 5, 23, 30, 0).unwrap());
    let service = EventService::with_clock(SqliteEventRepository::try_new(&conn).unwrap(), &clock);
    let owner = Uuid::new_v4();

    service.add_event(owner, &event("Past", day(4), None)).unwrap();
    for d in 5..12 {
        service
            .add_event(owner, &event(&format!("Day {d}"), day(d), at(9, 0)))
            .unwrap();
    }

    let today = service.today();
    assert_eq!(today, day(5));

    let default_list = service.upcoming(owner, today, None).unwrap();
    assert_eq!(default_list.len(), 5);
    assert_eq!(default_list[0].title, "Day 5");
    assert_eq!(default_list[4].title, "Day 9");

    assert_eq!(service.upcoming(owner, today, Some(2)).unwrap().len(), 2);
    assert!(service.upcoming(owner, today, Some(0)).unwrap().is_empty());
    assert!(service.upcoming(Uuid::new_v4(), today, None).unwrap().is_empty());
}

#[test]
fn delete_event_is_owner_scoped() {
    let conn = open_db_in_memory().unwrap();
    let service = EventService::new(SqliteEventRepository::try_new(&conn).unwrap());
    let owner = Uuid::new_v4();
    let created = service.add_event(owner, &event("Call", day(1), None)).unwrap();

    assert!(matches!(
        service.delete_event(Uuid::new_v4(), created.id),
        Err(ServiceError::NotFound(_))
    ));
    service.delete_event(owner, created.id).unwrap();
    assert!(service.events_on(owner, day(1)).unwrap().is_empty());
}

#[test]
fn added_event_equals_listed_event_at_sub_millisecond_clock() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(Utc.timestamp_nanos(1_720_000_000_000_000_999));
    let service = EventService::with_clock(SqliteEventRepository::try_new(&conn).unwrap(), &clock);
    let owner = Uuid::new_v4();

    let added = service.add_event(owner, &event("Dentist", day(9), at(8, 15))).unwrap();
    assert_eq!(service.events_on(owner, day(9)).unwrap(), vec![added]);
}
