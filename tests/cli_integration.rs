//! Integration tests for the `td` CLI.
//!
//! Each test creates a temp list directory, runs `td` as a subprocess with the
//! date pinned to 2026-10-19, and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const TODAY: &str = "2026-10-19";

/// Get the path to the built `td` binary.
fn td_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("td");
    path
}

const DEFAULT_TASKS: &str = r#"[
  { "id": "1", "text": "Buy milk", "completed": false, "due_date": "2026-10-19" },
  { "id": "2", "text": "Call mom", "completed": false, "due_date": "2026-10-20" },
  { "id": "3", "text": "Book flights", "completed": false, "due_date": "2026-10-26" }
]
"#;

/// Create a list in the given directory with the given tasks.json content.
fn create_test_list_with(root: &Path, tasks_json: &str) {
    let data_dir = root.join(".tudu");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(
        data_dir.join("config.toml"),
        r#"[list]
name = "Chores"

[reorder]
upcoming_offset_days = 7

[ui]
default_filter = "all"
max_text_width = 72
"#,
    )
    .unwrap();
    fs::write(data_dir.join("tasks.json"), tasks_json).unwrap();
}

/// A today / tomorrow / upcoming list with one task in each group.
fn create_test_list(root: &Path) {
    create_test_list_with(root, DEFAULT_TASKS);
}

/// Run `td` with the given args in the given directory, returning (stdout, stderr, success).
fn run_td(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(td_bin())
        .args(args)
        .current_dir(dir)
        .env("TUDU_TODAY", TODAY)
        .env_remove("TUDU_LOG")
        .output()
        .expect("failed to run td");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `td` expecting success, return stdout.
fn run_td_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_td(dir, args);
    if !success {
        panic!(
            "td {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Stored (id, due_date) pairs in master-list order.
fn stored(root: &Path) -> Vec<(String, String)> {
    let text = fs::read_to_string(root.join(".tudu/tasks.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|t| {
            (
                t["id"].as_str().unwrap().to_string(),
                t["due_date"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(id, due)| (id.to_string(), due.to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

#[test]
fn test_init_infers_name() {
    let tmp = tempfile::TempDir::new().unwrap();
    let dir = tmp.path().join("weekend-chores");
    fs::create_dir(&dir).unwrap();

    let out = run_td_ok(&dir, &["init"]);
    assert!(out.contains("Initialized list: Weekend Chores"));
    assert!(dir.join(".tudu/config.toml").exists());
    assert_eq!(
        fs::read_to_string(dir.join(".tudu/tasks.json")).unwrap().trim(),
        "[]"
    );

    let out = run_td_ok(&dir, &["list"]);
    assert!(out.starts_with("== Weekend Chores =="));
    assert!(out.contains("Today (0)"));
}

#[test]
fn test_init_twice_needs_force() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_td_ok(tmp.path(), &["init", "--name", "Home"]);
    run_td_ok(tmp.path(), &["add", "Buy milk"]);

    let (_, stderr, success) = run_td(tmp.path(), &["init"]);
    assert!(!success);
    assert!(stderr.contains("already exists"));

    // --force rewrites the config but keeps the tasks
    let out = run_td_ok(tmp.path(), &["init", "--name", "House", "--force"]);
    assert!(out.contains("Initialized list: House"));
    let out = run_td_ok(tmp.path(), &["list"]);
    assert!(out.contains("== House =="));
    assert!(out.contains("Buy milk"));
}

#[test]
fn test_not_a_list() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_td(tmp.path(), &["list"]);
    assert!(!success);
    assert!(stderr.contains("not a tudu list"));
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn test_list_grouped() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_td_ok(tmp.path(), &["list"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "== Chores ==",
            "",
            "Today (1)",
            "  0  [ ] Buy milk  (1)",
            "",
            "Tomorrow (1)",
            "  0  [ ] Call mom  (2)",
            "",
            "Upcoming (1)",
            "  0  [ ] Book flights  (due 2026-10-26)  (3)",
        ]
    );
}

#[test]
fn test_list_from_subdirectory() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let sub = tmp.path().join("notes/2026");
    fs::create_dir_all(&sub).unwrap();

    let out = run_td_ok(&sub, &["list"]);
    assert!(out.contains("Buy milk"));
}

#[test]
fn test_list_with_project_dir_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    let list_dir = tmp.path().join("list");
    let elsewhere = tmp.path().join("elsewhere");
    fs::create_dir(&list_dir).unwrap();
    fs::create_dir(&elsewhere).unwrap();
    create_test_list(&list_dir);

    let out = run_td_ok(&elsewhere, &["-C", list_dir.to_str().unwrap(), "list"]);
    assert!(out.contains("Call mom"));
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_td_ok(tmp.path(), &["list", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["name"], "Chores");
    assert_eq!(value["today"], TODAY);
    assert_eq!(value["groups"]["today"][0]["id"], "1");
    assert_eq!(value["groups"]["tomorrow"][0]["id"], "2");
    assert_eq!(value["groups"]["upcoming"][0]["due_date"], "2026-10-26");
    assert_eq!(value["groups"]["upcoming"][0]["index"], 0);
}

#[test]
fn test_list_filter_is_remembered() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    run_td_ok(tmp.path(), &["done", "2"]);

    let out = run_td_ok(tmp.path(), &["list", "--filter", "completed"]);
    assert!(out.starts_with("== Chores (completed) =="));
    assert!(out.contains("[x] Call mom"));
    assert!(!out.contains("Buy milk"));

    // No --filter: the last one is reused
    let out = run_td_ok(tmp.path(), &["list"]);
    assert!(out.starts_with("== Chores (completed) =="));

    let (_, stderr, success) = run_td(tmp.path(), &["list", "--filter", "pending"]);
    assert!(!success);
    assert!(stderr.contains("unknown filter"));
}

#[test]
fn test_overdue_tasks_are_in_today() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list_with(
        tmp.path(),
        r#"[{ "id": "7", "text": "Renew passport", "completed": false, "due_date": "2026-10-02" }]"#,
    );

    let out = run_td_ok(tmp.path(), &["list"]);
    assert!(out.contains("Today (1)"));
    assert!(out.contains("  0  [ ] Renew passport  (overdue since 2026-10-02)  (7)"));
}

#[test]
fn test_show_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_td_ok(tmp.path(), &["show", "3", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["text"], "Book flights");
    assert_eq!(value["group"], "upcoming");
    assert_eq!(value["index"], 0);
}

#[test]
fn test_show_not_found() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let (_, stderr, success) = run_td(tmp.path(), &["show", "42"]);
    assert!(!success);
    assert!(stderr.contains("task not found: 42"));
}

#[test]
fn test_search() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_td_ok(tmp.path(), &["search", "MOM|flight"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("tomorrow/0"));
    assert!(lines[1].starts_with("upcoming/0"));

    let out = run_td_ok(tmp.path(), &["search", "laundry"]);
    assert_eq!(out.trim(), "no matches");
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

#[test]
fn test_add_with_due_expression() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let id = run_td_ok(tmp.path(), &["add", "Water plants", "--due", "tomorrow"]);
    let id = id.trim().to_string();
    assert!(id.parse::<u64>().is_ok());

    // Stored in group order: appended to the end of tomorrow
    assert_eq!(
        stored(tmp.path()),
        pairs(&[
            ("1", "2026-10-19"),
            ("2", "2026-10-20"),
            (&id, "2026-10-20"),
            ("3", "2026-10-26"),
        ])
    );

    let out = run_td_ok(tmp.path(), &["add", "Pick up dry cleaning", "--due", "+3", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["due_date"], "2026-10-22");
    assert_eq!(value["group"], "upcoming");
    assert_eq!(value["index"], 1);
}

#[test]
fn test_add_rejects_bad_input() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let (_, stderr, success) = run_td(tmp.path(), &["add", "   "]);
    assert!(!success);
    assert!(stderr.contains("empty"));

    let (_, stderr, success) = run_td(tmp.path(), &["add", "Nap", "--due", "someday"]);
    assert!(!success);
    assert!(stderr.contains("invalid due date"));
    assert_eq!(stored(tmp.path()).len(), 3);
}

#[test]
fn test_edit_due_moves_group() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    run_td_ok(tmp.path(), &["edit", "3", "--due", "today", "--text", "Book train"]);
    assert_eq!(
        stored(tmp.path()),
        pairs(&[("1", "2026-10-19"), ("3", "2026-10-19"), ("2", "2026-10-20")])
    );
    let out = run_td_ok(tmp.path(), &["show", "3"]);
    assert!(out.contains("Book train"));
    assert!(out.contains("group: today #1"));
}

#[test]
fn test_done_toggle_and_clear() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    assert_eq!(run_td_ok(tmp.path(), &["done", "1"]).trim(), "1 done");
    assert_eq!(run_td_ok(tmp.path(), &["toggle", "2"]).trim(), "2 done");
    assert_eq!(run_td_ok(tmp.path(), &["undone", "2"]).trim(), "2 not done");

    let out = run_td_ok(tmp.path(), &["list"]);
    assert!(out.contains("  0  [x] Buy milk  (1)"));

    let out = run_td_ok(tmp.path(), &["clear"]);
    assert_eq!(out.trim(), "cleared 1 completed tasks");
    assert_eq!(
        stored(tmp.path()),
        pairs(&[("2", "2026-10-20"), ("3", "2026-10-26")])
    );
}

#[test]
fn test_rm() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_td_ok(tmp.path(), &["rm", "2"]);
    assert_eq!(out.trim(), "deleted 2 (Call mom)");

    let (_, stderr, success) = run_td(tmp.path(), &["rm", "2"]);
    assert!(!success);
    assert!(stderr.contains("task not found"));
}

// ---------------------------------------------------------------------------
// Moves
// ---------------------------------------------------------------------------

#[test]
fn test_mv_tomorrow_into_today() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_td_ok(tmp.path(), &["mv", "tomorrow", "0", "today", "1"]);
    assert_eq!(out.trim(), "2: tomorrow/0 → today/1 (due 2026-10-19)");
    assert_eq!(
        stored(tmp.path()),
        pairs(&[("1", "2026-10-19"), ("2", "2026-10-19"), ("3", "2026-10-26")])
    );

    let out = run_td_ok(tmp.path(), &["list"]);
    assert!(out.contains("Today (2)"));
    assert!(out.contains("Tomorrow (0)"));
}

#[test]
fn test_mv_within_today() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list_with(
        tmp.path(),
        r#"[
  { "id": "A", "text": "Buy milk", "due_date": "2026-10-19" },
  { "id": "B", "text": "Pay rent", "due_date": "2026-10-19" },
  { "id": "C", "text": "Call mom", "due_date": "2026-10-20" }
]"#,
    );

    run_td_ok(tmp.path(), &["mv", "today", "0", "today", "1"]);
    assert_eq!(
        stored(tmp.path()),
        pairs(&[("B", "2026-10-19"), ("A", "2026-10-19"), ("C", "2026-10-20")])
    );
}

#[test]
fn test_mv_into_upcoming_uses_configured_offset() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    // Past the end appends
    let out = run_td_ok(tmp.path(), &["mv", "today", "0", "upcoming", "9", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["id"], "1");
    assert_eq!(value["to"], "upcoming");
    assert_eq!(value["index"], 1);
    assert_eq!(value["due_date"], "2026-10-26");

    run_td_ok(tmp.path(), &["config", "upcoming-days", "3"]);
    run_td_ok(tmp.path(), &["mv", "tomorrow", "0", "upcoming", "0"]);
    assert_eq!(
        stored(tmp.path()),
        pairs(&[("2", "2026-10-22"), ("3", "2026-10-26"), ("1", "2026-10-26")])
    );
}

#[test]
fn test_mv_invalid_index_leaves_list_unchanged() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let before = fs::read_to_string(tmp.path().join(".tudu/tasks.json")).unwrap();

    let (_, stderr, success) = run_td(tmp.path(), &["mv", "tomorrow", "3", "today", "0"]);
    assert!(!success);
    assert!(stderr.contains("invalid source index 3 for group tomorrow"));

    let (_, stderr, success) = run_td(tmp.path(), &["mv", "later", "0", "today", "0"]);
    assert!(!success);
    assert!(stderr.contains("unknown group 'later'"));

    let after = fs::read_to_string(tmp.path().join(".tudu/tasks.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_mv_same_slot_is_noop() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_td_ok(tmp.path(), &["mv", "upcoming", "0", "upcoming", "5"]);
    assert_eq!(out.trim(), "3: upcoming/0 → upcoming/0 (due 2026-10-26)");
    assert_eq!(
        stored(tmp.path()),
        pairs(&[("1", "2026-10-19"), ("2", "2026-10-20"), ("3", "2026-10-26")])
    );
}

// ---------------------------------------------------------------------------
// Export / import
// ---------------------------------------------------------------------------

#[test]
fn test_export_import_merge() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let backup = tmp.path().join("backup.json");

    let out = run_td_ok(tmp.path(), &["export", backup.to_str().unwrap()]);
    assert!(out.contains("exported 3 tasks"));

    run_td_ok(tmp.path(), &["rm", "2"]);
    let out = run_td_ok(tmp.path(), &["import", backup.to_str().unwrap(), "--merge"]);
    assert_eq!(out.trim(), "merged 1 new tasks (3 total)");
    assert_eq!(
        stored(tmp.path()),
        pairs(&[("1", "2026-10-19"), ("2", "2026-10-20"), ("3", "2026-10-26")])
    );
}

#[test]
fn test_import_replace_and_reject_duplicates() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let incoming = tmp.path().join("incoming.json");

    fs::write(
        &incoming,
        r#"[{ "id": "9", "text": "Fix bike", "due_date": "2026-10-20T08:30:00.000Z" }]"#,
    )
    .unwrap();
    let out = run_td_ok(tmp.path(), &["import", incoming.to_str().unwrap()]);
    assert_eq!(out.trim(), "imported 1 tasks");
    assert_eq!(stored(tmp.path()), pairs(&[("9", "2026-10-20")]));

    fs::write(
        &incoming,
        r#"[{ "id": "9", "text": "a", "due_date": "2026-10-20" },
            { "id": "9", "text": "b", "due_date": "2026-10-20" }]"#,
    )
    .unwrap();
    let (_, stderr, success) = run_td(tmp.path(), &["import", incoming.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("duplicate task id"));
    assert_eq!(stored(tmp.path()), pairs(&[("9", "2026-10-20")]));
}

#[test]
fn test_export_stdout() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_td_ok(tmp.path(), &["export"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 3);
    assert_eq!(value[1]["due_date"], "2026-10-20");
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn test_config_show_and_set() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_td_ok(tmp.path(), &["config"]);
    assert!(out.contains("reorder.upcoming_offset_days: 7"));

    let (_, stderr, success) = run_td(tmp.path(), &["config", "upcoming-days", "1"]);
    assert!(!success);
    assert!(stderr.contains("at least 2"));

    run_td_ok(tmp.path(), &["config", "default-filter", "active"]);
    let out = run_td_ok(tmp.path(), &["config", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["ui"]["default_filter"], "active");
    assert_eq!(value["reorder"]["upcoming_offset_days"], 7);

    // Edits keep the rest of the document
    let text = fs::read_to_string(tmp.path().join(".tudu/config.toml")).unwrap();
    assert!(text.contains("[list]"));
}
