use chrono::{TimeZone, Utc};
use dailykit_core::{format_message, Habit, HabitState, StreakTier};
use serde_json::json;
use uuid::Uuid;

#[test]
fn habit_serializes_with_rfc3339_timestamps() {
    let habit = Habit {
        id: Uuid::nil(),
        owner: Uuid::nil(),
        title: "Read".to_string(),
        streak: 4,
        last_completed_at: Some(Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap()),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
    };

    let value = serde_json::to_value(&habit).unwrap();
    assert_eq!(value["title"], "Read");
    assert_eq!(value["streak"], 4);
    assert_eq!(value["last_completed_at"], "2024-05-06T09:00:00Z");
    assert_eq!(value["id"], "00000000-0000-0000-0000-000000000000");

    let parsed: Habit = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, habit);
}

#[test]
fn enums_serialize_as_snake_case_tags() {
    assert_eq!(
        serde_json::to_value(StreakTier::for_streak(14)).unwrap(),
        json!("strong")
    );
    assert_eq!(
        serde_json::to_value(HabitState::CompletedToday).unwrap(),
        json!("completed_today")
    );
    assert_eq!(
        serde_json::to_value(format_message("a **b**")).unwrap(),
        json!([
            {"kind": "plain", "text": "a "},
            {"kind": "bold", "text": "b"},
        ])
    );
}
