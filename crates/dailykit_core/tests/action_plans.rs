use chrono::{Duration, TimeZone, Utc};
use dailykit_core::db::open_db_in_memory;
use dailykit_core::{
    ManualClock, NewPlan, PlanService, ServiceError, SqlitePlanRepository, ValidationError,
};
use uuid::Uuid;

fn request(title: &str, tasks: &[&str]) -> NewPlan {
    NewPlan {
        title: title.to_string(),
        description: "  ship it  ".to_string(),
        tasks: tasks.iter().map(|task| task.to_string()).collect(),
    }
}

#[test]
fn create_plan_keeps_task_order_and_drops_blank_tasks() {
    let conn = open_db_in_memory().unwrap();
    let service = PlanService::new(SqlitePlanRepository::try_new(&conn).unwrap());
    let owner = Uuid::new_v4();

    let plan = service
        .create_plan(owner, &request(" Launch ", &["draft", " ", "review", "publish"]))
        .unwrap();

    assert_eq!(plan.title, "Launch");
    assert_eq!(plan.description, "ship it");
    let titles: Vec<&str> = plan.tasks.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["draft", "review", "publish"]);
    assert!(plan.tasks.iter().all(|task| !task.completed));
    assert_eq!(plan.progress_percent(), 0);

    let listed = service.list_plans(owner).unwrap();
    assert_eq!(listed, vec![plan]);
}

#[test]
fn invalid_plans_are_rejected_without_writes() {
    let conn = open_db_in_memory().unwrap();
    let service = PlanService::new(SqlitePlanRepository::try_new(&conn).unwrap());
    let owner = Uuid::new_v4();

    assert!(matches!(
        service.create_plan(owner, &request("  ", &["a"])),
        Err(ServiceError::Validation(ValidationError::BlankTitle))
    ));
    assert!(matches!(
        service.create_plan(owner, &request("Trip", &["", "  "])),
        Err(ServiceError::Validation(ValidationError::NoPlanTasks))
    ));
    assert!(service.list_plans(owner).unwrap().is_empty());
}

#[test]
fn toggle_task_flips_one_task_and_updates_progress() {
    let conn = open_db_in_memory().unwrap();
    let service = PlanService::new(SqlitePlanRepository::try_new(&conn).unwrap());
    let owner = Uuid::new_v4();
    let plan = service
        .create_plan(owner, &request("Move", &["pack", "load", "unpack"]))
        .unwrap();
    let load = plan.tasks[1].id;

    let toggled = service.toggle_task(owner, plan.id, load).unwrap();
    assert!(toggled.tasks[1].completed);
    assert!(!toggled.tasks[0].completed && !toggled.tasks[2].completed);
    assert_eq!(toggled.progress_percent(), 33);

    let stored = service.list_plans(owner).unwrap().remove(0);
    assert_eq!(stored, toggled);

    let back = service.toggle_task(owner, plan.id, load).unwrap();
    assert_eq!(back.completed_count(), 0);
}

#[test]
fn toggle_reports_missing_plan_or_task() {
    let conn = open_db_in_memory().unwrap();
    let service = PlanService::new(SqlitePlanRepository::try_new(&conn).unwrap());
    let owner = Uuid::new_v4();
    let plan = service.create_plan(owner, &request("Tax", &["gather"])).unwrap();
    let task = plan.tasks[0].id;

    let missing_task = Uuid::new_v4();
    assert!(matches!(
        service.toggle_task(owner, plan.id, missing_task),
        Err(ServiceError::NotFound(id)) if id == missing_task
    ));
    assert!(matches!(
        service.toggle_task(Uuid::new_v4(), plan.id, task),
        Err(ServiceError::NotFound(id)) if id == plan.id
    ));
}

#[test]
fn plans_list_newest_first_and_delete_cascades_tasks() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
    let service = PlanService::with_clock(SqlitePlanRepository::try_new(&conn).unwrap(), &clock);
    let owner = Uuid::new_v4();

    let older = service.create_plan(owner, &request("Old", &["a"])).unwrap();
    clock.advance(Duration::hours(1));
    let newer = service.create_plan(owner, &request("New", &["b", "c"])).unwrap();

    let ids: Vec<Uuid> = service
        .list_plans(owner)
        .unwrap()
        .iter()
        .map(|plan| plan.id)
        .collect();
    assert_eq!(ids, vec![newer.id, older.id]);

    service.delete_plan(owner, newer.id).unwrap();
    let remaining_tasks: i64 = conn
        .query_row("SELECT COUNT(*) FROM plan_tasks;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining_tasks, 1);

    assert!(matches!(
        service.delete_plan(owner, newer.id),
        Err(ServiceError::NotFound(_))
    ));
}

#[test]
fn created_plan_equals_listed_plan_at_sub_millisecond_clock() {
    let conn = open_db_in_memory().unwrap();
    let clock = ManualClock::new(Utc.timestamp_nanos(1_720_000_000_987_654_321));
    let service = PlanService::with_clock(SqlitePlanRepository::try_new(&conn).unwrap(), &clock);
    let owner = Uuid::new_v4();

    let plan = service.create_plan(owner, &request("Trip", &["pack"])).unwrap();
    assert_eq!(plan.created_at.timestamp_subsec_nanos(), 987_000_000);
    assert_eq!(service.list_plans(owner).unwrap(), vec![plan]);
}
