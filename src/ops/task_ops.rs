use chrono::NaiveDate;

use crate::model::task::Task;

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("task text cannot be empty")]
    EmptyText,
    #[error("no task id left above {0}")]
    IdsExhausted(String),
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// Append a new task and return its id.
///
/// `now_millis` seeds the id; it is bumped past every numeric id already in
/// the list so ids stay unique and increasing.
pub fn add_task(
    tasks: &mut Vec<Task>,
    text: &str,
    due_date: NaiveDate,
    now_millis: i64,
) -> Result<String, TaskError> {
    let text = clean_text(text)?;
    let id = next_id(tasks, now_millis)?;
    tasks.push(Task::new(id.clone(), text, due_date));
    Ok(id)
}

/// Replace a task's text.
pub fn edit_text(tasks: &mut [Task], task_id: &str, new_text: &str) -> Result<(), TaskError> {
    let text = clean_text(new_text)?;
    let task = find_task_mut(tasks, task_id).ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
    task.text = text;
    Ok(())
}

/// Change a task's due date. The task's group follows from the new date.
pub fn set_due_date(tasks: &mut [Task], task_id: &str, due_date: NaiveDate) -> Result<(), TaskError> {
    let task = find_task_mut(tasks, task_id).ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
    task.due_date = due_date;
    Ok(())
}

/// Flip completion. Returns the new completed state.
pub fn toggle_completed(tasks: &mut [Task], task_id: &str) -> Result<bool, TaskError> {
    let task = find_task_mut(tasks, task_id).ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
    task.completed = !task.completed;
    Ok(task.completed)
}

/// Set completion explicitly. Returns whether anything changed.
pub fn set_completed(tasks: &mut [Task], task_id: &str, completed: bool) -> Result<bool, TaskError> {
    let task = find_task_mut(tasks, task_id).ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
    if task.completed == completed {
        return Ok(false);
    }
    task.completed = completed;
    Ok(true)
}

/// Remove a task, returning it.
pub fn delete_task(tasks: &mut Vec<Task>, task_id: &str) -> Result<Task, TaskError> {
    let idx = tasks
        .iter()
        .position(|t| t.id == task_id)
        .ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
    Ok(tasks.remove(idx))
}

/// Remove every completed task. Returns how many were removed.
pub fn clear_completed(tasks: &mut Vec<Task>) -> usize {
    let before = tasks.len();
    tasks.retain(|t| !t.completed);
    before - tasks.len()
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

pub fn find_task<'a>(tasks: &'a [Task], task_id: &str) -> Option<&'a Task> {
    tasks.iter().find(|t| t.id == task_id)
}

pub fn find_task_mut<'a>(tasks: &'a mut [Task], task_id: &str) -> Option<&'a mut Task> {
    tasks.iter_mut().find(|t| t.id == task_id)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn clean_text(text: &str) -> Result<String, TaskError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TaskError::EmptyText);
    }
    Ok(trimmed.to_string())
}

/// Next id: the current time in milliseconds, or one past the highest numeric
/// id in the list if that is larger. Fails rather than wrap once the highest
/// id is `i64::MAX`.
fn next_id(tasks: &[Task], now_millis: i64) -> Result<String, TaskError> {
    let max = tasks
        .iter()
        .filter_map(|t| t.id.parse::<i64>().ok())
        .max();
    let exhausted = |last: i64| TaskError::IdsExhausted(last.to_string());
    let mut candidate = match max {
        Some(m) if m >= now_millis => m.checked_add(1).ok_or_else(|| exhausted(m))?,
        _ => now_millis,
    };
    // Non-numeric ids (e.g. from an import) can't collide with a number
    // unless they spell one; skip any that do.
    while tasks.iter().any(|t| t.id == candidate.to_string()) {
        candidate = candidate.checked_add(1).ok_or_else(|| exhausted(candidate))?;
    }
    Ok(candidate.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
