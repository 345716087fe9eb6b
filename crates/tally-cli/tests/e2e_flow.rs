//! End-to-end tests for the `tally` binary.
//!
//! Tests the full pipeline: import → background achievement evaluation →
//! calendar, habit and achievement queries against one database file.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn tally_binary() -> String {
    env!("CARGO_BIN_EXE_tally").to_string()
}

fn tally(home: &Path, args: &[&str]) -> Output {
    tally_with_stdin(home, args, "")
}

fn tally_with_stdin(home: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(tally_binary())
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("TALLY_DATABASE_PATH", home.join("data/tally.db"))
        .env("TALLY_OWNER", "sam")
        .env_remove("RUST_LOG")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn tally");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(
        output.status.success(),
        "tally {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

const RECORDS: &str = r#"{"domain":"habits","record":{"id":"read","title":"Read","frequency":"daily","created_at":"2024-05-01T08:00:00Z"}}
{"domain":"habit_completions","record":{"habit_id":"read","date":"2024-05-01"}}
{"domain":"habit_completions","record":{"habit_id":"read","date":"2024-05-02"}}
{"domain":"habit_completions","record":{"habit_id":"read","date":"2024-05-03"}}
{"domain":"mood","record":{"date":"2024-05-02","rating":4}}
{"domain":"media","record":{"title":"Dune","media_type":"book","completed":"2024-05-02"}}
{"domain":"tasks","record":{"title":"Taxes","due_date":"2024-05-02"}}
{"domain":"events","record":{"title":"Conference","date":"2024-05-01","end_date":"2024-05-03"}}
"#;

#[test]
fn import_then_query() {
    let temp = TempDir::new().unwrap();
    let home = temp.path();

    let imported = tally_with_stdin(home, &["import"], RECORDS);
    assert_eq!(stdout(&imported), "Imported 8 records.\n");
    assert!(home.join("data/tally.db").exists());

    // The import queued evaluations for the habits, mood, media and tasks
    // categories; the process waits for them before exiting.
    let unlocked = tally(home, &["achievements", "list", "--unlocked", "--json"]);
    let statuses: serde_json::Value = serde_json::from_slice(&unlocked.stdout).unwrap();
    let ids: Vec<&str> = statuses
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["achievement"]["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"habit-master-1"), "unlocked: {ids:?}");
    assert!(ids.contains(&"bookworm-1"), "unlocked: {ids:?}");

    let calendar = tally(
        home,
        &[
            "calendar",
            "--start",
            "2024-05-01",
            "--end",
            "2024-05-04",
            "--today",
            "2024-05-10",
        ],
    );
    let text = stdout(&calendar);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 3, "{text}");
    assert!(lines[1].starts_with("2024-05-02  mood 4"));
    assert!(lines[1].contains("tasks 1 overdue"));
    assert!(lines[1].contains("1 event (Conference)"));

    let stats = tally(home, &["habits", "stats", "read", "--today", "2024-05-04"]);
    let stats: serde_json::Value = serde_json::from_slice(&stats.stdout).unwrap();
    assert_eq!(stats["longestStreak"], 3);
    assert_eq!(stats["currentStreak"], 3);
    assert_eq!(stats["totalCompletions"], 3);
}

#[test]
fn toggle_records_completion_and_evaluates() {
    let temp = TempDir::new().unwrap();
    let home = temp.path();

    let added = tally(home, &["habits", "add", "Stretch", "--frequency", "every_other_day"]);
    let habit_id = stdout(&added).trim().to_string();
    assert!(!habit_id.is_empty());

    let toggled = tally(home, &["habits", "toggle", &habit_id, "--date", "2024-05-01"]);
    assert_eq!(stdout(&toggled), "Stretch: done on 2024-05-01\n");

    let listed = tally(home, &["achievements", "list", "--category", "habits", "--unlocked"]);
    assert!(stdout(&listed).contains("[x]"));

    let undone = tally(home, &["habits", "toggle", &habit_id, "--date", "2024-05-01"]);
    assert_eq!(stdout(&undone), "Stretch: cleared 2024-05-01\n");

    // Unlocks survive the completion being removed.
    let listed = tally(home, &["achievements", "list", "--category", "habits", "--unlocked"]);
    assert!(stdout(&listed).contains("[x]"));
}

#[test]
fn archive_hides_and_remove_deletes() {
    let temp = TempDir::new().unwrap();
    let home = temp.path();

    let added = tally(home, &["habits", "add", "Floss"]);
    let habit_id = stdout(&added).trim().to_string();
    tally(home, &["habits", "toggle", &habit_id, "--date", "2024-05-01"]);

    let archived = tally(home, &["habits", "archive", &habit_id]);
    assert_eq!(stdout(&archived), "Archived Floss\n");
    let listed = tally(home, &["habits", "list"]);
    assert!(stdout(&listed).starts_with("No habits yet."));
    let listed = tally(home, &["habits", "list", "--all"]);
    assert!(stdout(&listed).contains("Floss"));

    let restored = tally(home, &["habits", "archive", &habit_id, "--restore"]);
    assert_eq!(stdout(&restored), "Restored Floss\n");
    assert!(stdout(&tally(home, &["habits", "list"])).contains("Floss"));

    let removed = tally(home, &["habits", "remove", &habit_id]);
    assert_eq!(stdout(&removed), "Removed Floss\n");
    let listed = tally(home, &["habits", "list", "--all"]);
    assert!(stdout(&listed).starts_with("No habits yet."));
}

#[test]
fn month_with_no_records() {
    let temp = TempDir::new().unwrap();
    let output = tally(temp.path(), &["month", "2024-02"]);
    assert_eq!(
        stdout(&output),
        "No records between 2024-02-01 and 2024-02-29.\n"
    );
}
