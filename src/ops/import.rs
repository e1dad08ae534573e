//! JSON import and export of the master list.

use std::collections::HashSet;

use crate::model::task::Task;

/// Error type for import operations
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid task JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate task id in import: {0}")]
    DuplicateId(String),
    #[error("task {0} has empty text")]
    EmptyText(String),
    #[error("task at position {0} has an empty id")]
    EmptyId(usize),
}

/// Serialize the list as a pretty JSON array.
pub fn export_json(tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(tasks)
}

/// Parse and validate a JSON array of tasks.
pub fn parse_json(text: &str) -> Result<Vec<Task>, ImportError> {
    let mut tasks: Vec<Task> = serde_json::from_str(text)?;
    let mut seen = HashSet::new();
    for (i, task) in tasks.iter_mut().enumerate() {
        if task.id.trim().is_empty() {
            return Err(ImportError::EmptyId(i));
        }
        if !seen.insert(task.id.clone()) {
            return Err(ImportError::DuplicateId(task.id.clone()));
        }
        let trimmed = task.text.trim();
        if trimmed.is_empty() {
            return Err(ImportError::EmptyText(task.id.clone()));
        }
        if trimmed.len() != task.text.len() {
            task.text = trimmed.to_string();
        }
    }
    Ok(tasks)
}

/// Append incoming tasks whose ids are not already present.
/// Returns the merged list and the number of tasks added.
pub fn merge(existing: &[Task], incoming: Vec<Task>) -> (Vec<Task>, usize) {
    let known: HashSet<&str> = existing.iter().map(|t| t.id.as_str()).collect();
    let new: Vec<Task> = incoming
        .into_iter()
        .filter(|t| !known.contains(t.id.as_str()))
        .collect();
    let added = new.len();
    let mut merged = existing.to_vec();
    merged.extend(new);
    (merged, added)
}
