//! End-to-end runs of the `dailykit` binary against a temp database.

use serde_json::Value;
use std::path::Path;
use std::process::Command;

/// Runs the binary and returns `(exit code, stdout, stderr)`.
fn run_cli(dir: &Path, args: &[&str]) -> (i32, String, String) {
    let db = dir.join("cli.sqlite3");
    let config = dir.join("missing.toml");
    let output = Command::new(env!("CARGO_BIN_EXE_dailykit"))
        .arg("--config")
        .arg(&config)
        .arg("--db")
        .arg(&db)
        .args(args)
        .output()
        .expect("failed to execute dailykit");

    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

fn json(stdout: &str) -> Value {
    serde_json::from_str(stdout).expect("stdout is JSON")
}

#[test]
fn habit_add_done_and_list() {
    let dir = tempfile::tempdir().unwrap();

    let (code, stdout, _) = run_cli(dir.path(), &["--json", "habit", "add", "Read"]);
    assert_eq!(code, 0);
    let created = json(&stdout);
    assert_eq!(created["streak"], 0);
    assert_eq!(created["state"], "never");
    let id = created["id"].as_str().unwrap().to_string();

    let (code, stdout, _) = run_cli(dir.path(), &["--json", "habit", "done", &id]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["streak"], 1);

    let (code, stdout, _) = run_cli(dir.path(), &["--json", "habit", "list"]);
    assert_eq!(code, 0);
    let listed = json(&stdout);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["state"], "completed_today");
    assert_eq!(listed[0]["tier"], "new");
}

#[test]
fn blank_habit_title_fails_with_error_message() {
    let dir = tempfile::tempdir().unwrap();

    let (code, _, stderr) = run_cli(dir.path(), &["habit", "add", "   "]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"), "stderr: {stderr}");

    let (code, stdout, _) = run_cli(dir.path(), &["habit", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("no habits yet"));
}

#[test]
fn removing_unknown_habit_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(
        dir.path(),
        &["habit", "rm", "7d444840-9dc0-11d1-b245-5ffdce74fad2"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("not found"));
}

#[test]
fn plan_toggle_updates_progress() {
    let dir = tempfile::tempdir().unwrap();

    let (code, stdout, _) = run_cli(
        dir.path(),
        &["--json", "plan", "add", "Trip", "--task", "book", "--task", "pack"],
    );
    assert_eq!(code, 0);
    let plan = json(&stdout);
    let plan_id = plan["id"].as_str().unwrap().to_string();
    let task_id = plan["tasks"][0]["id"].as_str().unwrap().to_string();

    let (code, stdout, _) = run_cli(dir.path(), &["plan", "toggle", &plan_id, &task_id]);
    assert_eq!(code, 0);
    assert!(stdout.contains("1/2 (50%)"));
}

#[test]
fn events_and_chat_round_trip_through_the_store() {
    let dir = tempfile::tempdir().unwrap();

    let (code, _, _) = run_cli(
        dir.path(),
        &["event", "add", "Dentist", "--date", "2031-01-02", "--time", "14:30"],
    );
    assert_eq!(code, 0);
    let (code, stdout, _) = run_cli(dir.path(), &["--json", "event", "day", "2031-01-02"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)[0]["time"], "14:30:00");

    let (code, _, _) = run_cli(
        dir.path(),
        &["chat", "record", "--message", "hi", "--response", "**hello**"],
    );
    assert_eq!(code, 0);
    let (code, stdout, _) = run_cli(dir.path(), &["--json", "chat", "history"]);
    assert_eq!(code, 0);
    let days = json(&stdout);
    assert_eq!(days[0]["messages"][1]["role"], "assistant");
}

#[test]
fn note_search_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();

    let (code, _, _) = run_cli(
        dir.path(),
        &["note", "add", "Groceries", "--content", "oat milk, eggs"],
    );
    assert_eq!(code, 0);
    let (code, stdout, _) = run_cli(
        dir.path(),
        &["--json", "note", "add", "Ideas", "--content", "MILK crate name"],
    );
    assert_eq!(code, 0);
    let id = json(&stdout)["id"].as_str().unwrap().to_string();

    let (code, stdout, _) = run_cli(dir.path(), &["--json", "note", "list", "--search", "Milk"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout).as_array().unwrap().len(), 2);

    let (code, _, _) = run_cli(
        dir.path(),
        &["note", "edit", &id, "--title", "Ideas", "--content", "crate name"],
    );
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["--json", "note", "list", "--search", "milk"]);
    let found = json(&stdout);
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["title"], "Groceries");

    let (code, stdout, _) = run_cli(dir.path(), &["note", "list", "--search", "bread"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("no notes found"));
}

#[test]
fn journal_filters_by_category() {
    let dir = tempfile::tempdir().unwrap();

    let (code, stdout, _) = run_cli(
        dir.path(),
        &["--json", "journal", "add", "Chapter 4", "--content", "graphs", "--category", "study"],
    );
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["category"], "study");
    let (code, stdout, _) = run_cli(
        dir.path(),
        &["--json", "journal", "add", "Sunday", "--content", "slow walk"],
    );
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["category"], "personal");

    let (_, stdout, _) = run_cli(dir.path(), &["--json", "journal", "list", "--category", "study"]);
    let study = json(&stdout);
    assert_eq!(study.as_array().unwrap().len(), 1);
    assert_eq!(study[0]["title"], "Chapter 4");

    let (code, _, stderr) = run_cli(dir.path(), &["journal", "list", "--category", "work"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("unknown category"), "stderr: {stderr}");
}
