use chrono::{Duration, TimeZone, Utc};
use dailykit_core::db::open_db_in_memory;
use dailykit_core::{
    ManualClock, NoteDraft, NoteService, ServiceError, SqliteNoteRepository, ValidationError,
};
use uuid::Uuid;

#[test]
fn notes_are_listed_newest_first_and_scoped_to_owner() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
    let service = NoteService::with_clock(SqliteNoteRepository::try_new(&conn).unwrap(), &clock);
    let owner = Uuid::new_v4();

    let older = service
        .create_note(owner, &NoteDraft::new(" Groceries ", " milk "))
        .unwrap();
    clock.advance(Duration::minutes(1));
    let newer = service
        .create_note(owner, &NoteDraft::new("Ideas", "rust cli"))
        .unwrap();
    service
        .create_note(Uuid::new_v4(), &NoteDraft::new("Theirs", "private"))
        .unwrap();

    assert_eq!(older.title, "Groceries");
    assert_eq!(older.content, "milk");
    assert_eq!(older.updated_at, older.created_at);
    assert_eq!(service.list_notes(owner, None).unwrap(), vec![newer, older]);
}

#[test]
fn search_matches_title_or_content_ignoring_case() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let owner = Uuid::new_v4();

    service
        .create_note(owner, &NoteDraft::new("Groceries", "oat milk"))
        .unwrap();
    service
        .create_note(owner, &NoteDraft::new("Reading list", "Milkman by Anna Burns"))
        .unwrap();
    service
        .create_note(owner, &NoteDraft::new("Workout", "squats"))
        .unwrap();

    let titles = |search: Option<&str>| -> Vec<String> {
        let mut titles: Vec<String> = service
            .list_notes(owner, search)
            .unwrap()
            .into_iter()
            .map(|note| note.title)
            .collect();
        titles.sort();
        titles
    };
    assert_eq!(titles(Some("MILK")), vec!["Groceries", "Reading list"]);
    assert_eq!(titles(Some("reading")), vec!["Reading list"]);
    assert_eq!(titles(Some("  ")).len(), 3);
    assert!(titles(Some("yoga")).is_empty());
}

#[test]
fn update_replaces_text_and_keeps_creation_time() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(Utc.timestamp_nanos(1_709_280_000_555_666_777));
    let service = NoteService::with_clock(SqliteNoteRepository::try_new(&conn).unwrap(), &clock);
    let owner = Uuid::new_v4();

    let note = service
        .create_note(owner, &NoteDraft::new("Draft", "v1"))
        .unwrap();
    clock.advance(Duration::hours(2));
    let updated = service
        .update_note(owner, note.id, &NoteDraft::new("Final", " v2 "))
        .unwrap();

    assert_eq!(updated.id, note.id);
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.content, "v2");
    assert_eq!(updated.created_at, note.created_at);
    assert_eq!(updated.updated_at, note.created_at + Duration::hours(2));
    assert_eq!(service.list_notes(owner, None).unwrap(), vec![updated]);

    assert!(matches!(
        service.update_note(owner, note.id, &NoteDraft::new("Final", "")),
        Err(ServiceError::Validation(ValidationError::BlankContent))
    ));
    assert!(matches!(
        service.update_note(Uuid::new_v4(), note.id, &NoteDraft::new("x", "y")),
        Err(ServiceError::NotFound(id)) if id == note.id
    ));
}

#[test]
fn blank_notes_are_rejected_and_delete_is_owner_scoped() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let owner = Uuid::new_v4();

    assert!(matches!(
        service.create_note(owner, &NoteDraft::new(" ", "body")),
        Err(ServiceError::Validation(ValidationError::BlankTitle))
    ));
    assert!(service.list_notes(owner, None).unwrap().is_empty());

    let note = service
        .create_note(owner, &NoteDraft::new("Keep", "me"))
        .unwrap();
    assert!(matches!(
        service.delete_note(Uuid::new_v4(), note.id),
        Err(ServiceError::NotFound(_))
    ));
    service.delete_note(owner, note.id).unwrap();
    assert!(service.list_notes(owner, None).unwrap().is_empty());
    assert!(matches!(
        service.delete_note(owner, note.id),
        Err(ServiceError::NotFound(_))
    ));
}
