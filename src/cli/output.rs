use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::group::Group;
use crate::model::task::Task;
use crate::ops::filter::Filter;
use crate::ops::reorder::group_view;
use crate::util::unicode::{pad_to_width, single_line, truncate_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub due_date: String,
    pub group: Group,
    /// Position within the group, as accepted by `td mv`
    pub index: usize,
}

#[derive(Serialize)]
pub struct ListingJson {
    pub name: String,
    pub today: String,
    pub filter: Filter,
    /// Group name → tasks, always in today/tomorrow/upcoming order
    pub groups: IndexMap<Group, Vec<TaskJson>>,
}

#[derive(Serialize)]
pub struct MoveJson {
    pub id: String,
    pub from: Group,
    pub to: Group,
    pub index: usize,
    pub due_date: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task, group: Group, index: usize) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        text: task.text.clone(),
        completed: task.completed,
        due_date: format_date(task.due_date),
        group,
        index,
    }
}

/// Locate a task in the group views: (group, index within group)
pub fn task_position(tasks: &[Task], today: NaiveDate, task_id: &str) -> Option<(Group, usize)> {
    group_view(tasks, today).into_iter().find_map(|(group, members)| {
        members
            .iter()
            .position(|t| t.id == task_id)
            .map(|idx| (group, idx))
    })
}

pub fn listing_to_json(name: &str, tasks: &[Task], today: NaiveDate, filter: Filter) -> ListingJson {
    let mut groups = IndexMap::new();
    for (group, members) in group_view(tasks, today) {
        let entries = members
            .iter()
            .enumerate()
            .filter(|(_, t)| filter.matches(t))
            .map(|(i, t)| task_to_json(t, group, i))
            .collect();
        groups.insert(group, entries);
    }
    ListingJson {
        name: name.to_string(),
        today: format_date(today),
        filter,
        groups,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn check_char(task: &Task) -> char {
    if task.completed { 'x' } else { ' ' }
}

/// Date annotation shown after the text, if any. Tasks due today and
/// tomorrow need none; overdue and upcoming ones show their date.
fn date_note(task: &Task, group: Group, today: NaiveDate) -> String {
    match group {
        Group::Today if task.due_date < today => {
            format!("  (overdue since {})", format_date(task.due_date))
        }
        Group::Upcoming => format!("  (due {})", format_date(task.due_date)),
        _ => String::new(),
    }
}

/// Checkbox, text and annotations, without the index column
fn format_task_body(task: &Task, group: Group, today: NaiveDate, max_width: usize) -> String {
    let text = single_line(&task.text);
    let text = if max_width > 0 {
        truncate_to_width(&text, max_width)
    } else {
        text
    };
    format!(
        "[{}] {}{}  ({})",
        check_char(task),
        text,
        date_note(task, group, today),
        task.id
    )
}

/// One task as a listing line: `  0  [ ] Buy milk  (id)`
pub fn format_task_line(task: &Task, group: Group, index: usize, today: NaiveDate, max_width: usize) -> String {
    format!("{:>3}  {}", index, format_task_body(task, group, today, max_width))
}

/// Full grouped listing. Indices are positions in the unfiltered group so they
/// stay valid for `td mv` whatever filter is active.
pub fn format_listing(
    name: &str,
    tasks: &[Task],
    today: NaiveDate,
    filter: Filter,
    max_width: usize,
) -> Vec<String> {
    let mut lines = Vec::new();
    if filter == Filter::All {
        lines.push(format!("== {} ==", name));
    } else {
        lines.push(format!("== {} ({}) ==", name, filter));
    }

    for (group, members) in group_view(tasks, today) {
        let shown: Vec<(usize, &Task)> = members
            .iter()
            .enumerate()
            .filter(|(_, t)| filter.matches(t))
            .map(|(i, t)| (i, *t))
            .collect();

        lines.push(String::new());
        lines.push(format!("{} ({})", group.label(), shown.len()));
        if shown.is_empty() {
            lines.push("  (empty)".to_string());
        }
        for (i, task) in shown {
            lines.push(format_task_line(task, group, i, today, max_width));
        }
    }
    lines
}

/// Detailed single-task view
pub fn format_task_detail(task: &Task, group: Group, index: usize) -> Vec<String> {
    vec![
        format!("[{}] {}", check_char(task), task.text),
        format!("id: {}", task.id),
        format!("due: {}", format_date(task.due_date)),
        format!("group: {} #{}", group, index),
        format!("completed: {}", if task.completed { "yes" } else { "no" }),
    ]
}

/// Search hit: `group/index` column, then the task
pub fn format_search_hit(task: &Task, group: Group, index: usize, today: NaiveDate, max_width: usize) -> String {
    let position = pad_to_width(&format!("{}/{}", group, index), 12);
    format!("{}{}", position, format_task_body(task, group, today, max_width))
}

/// Summary of config values for `td config`
pub fn format_config(config: &crate::model::config::Config) -> Vec<String> {
    vec![
        format!("name: {}", config.list.name),
        format!(
            "reorder.upcoming_offset_days: {}",
            config.reorder.upcoming_offset_days
        ),
        format!("ui.default_filter: {}", config.ui.default_filter),
        format!("ui.max_text_width: {}", config.ui.max_text_width),
    ]
}
