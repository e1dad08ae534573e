//! Reorder/regroup engine.
//!
//! The master list is always the concatenation of the three group views
//! (today, tomorrow, upcoming). A move takes a task out of one group view at a
//! visual index and puts it into another group view at a visual index,
//! re-dating it when it changes group, then flattens the views back into the
//! master list. Nothing here reads the clock: callers pass `today` in, captured
//! once per operation.

use chrono::NaiveDate;

use crate::model::group::Group;
use crate::model::task::Task;

/// Error type for reorder operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    #[error("invalid source index {index} for group {group} (group has {len} tasks)")]
    InvalidIndex {
        group: Group,
        index: usize,
        len: usize,
    },
}

/// A single drag-and-drop move: from a visual position in one group to a
/// visual position in another (or the same) group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveInstruction {
    pub source_group: Group,
    pub source_index: usize,
    pub dest_group: Group,
    pub dest_index: usize,
}

impl MoveInstruction {
    pub fn new(source_group: Group, source_index: usize, dest_group: Group, dest_index: usize) -> Self {
        MoveInstruction {
            source_group,
            source_index,
            dest_group,
            dest_index,
        }
    }
}

/// The master list split into its three group views, each in master-list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub today: Vec<Task>,
    pub tomorrow: Vec<Task>,
    pub upcoming: Vec<Task>,
}

impl Partition {
    /// Partition `tasks` by group against `today`, preserving relative order.
    pub fn of(tasks: &[Task], today: NaiveDate) -> Self {
        let mut partition = Partition::default();
        for task in tasks {
            partition
                .group_mut(Group::of(task.due_date, today))
                .push(task.clone());
        }
        partition
    }

    pub fn group(&self, group: Group) -> &[Task] {
        match group {
            Group::Today => &self.today,
            Group::Tomorrow => &self.tomorrow,
            Group::Upcoming => &self.upcoming,
        }
    }

    pub fn group_mut(&mut self, group: Group) -> &mut Vec<Task> {
        match group {
            Group::Today => &mut self.today,
            Group::Tomorrow => &mut self.tomorrow,
            Group::Upcoming => &mut self.upcoming,
        }
    }

    /// Flatten back into a master list: today, then tomorrow, then upcoming.
    pub fn into_list(self) -> Vec<Task> {
        let mut list = self.today;
        list.extend(self.tomorrow);
        list.extend(self.upcoming);
        list
    }
}

/// Per-group views over borrowed tasks, for display. Each entry's position in
/// its vector is the visual index a move instruction refers to.
pub fn group_view(tasks: &[Task], today: NaiveDate) -> Vec<(Group, Vec<&Task>)> {
    Group::ALL
        .iter()
        .map(|&g| {
            let members = tasks
                .iter()
                .filter(|t| Group::of(t.due_date, today) == g)
                .collect();
            (g, members)
        })
        .collect()
}

/// Rewrite the master list so it is the concatenation of its group views.
/// The sort is stable, so relative order within each group is kept.
pub fn regroup(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    let mut list = tasks.to_vec();
    list.sort_by_key(|t| Group::of(t.due_date, today).rank());
    list
}

/// Apply a move. Returns the new master list, or `InvalidIndex` if
/// `source_index` does not address a task in the source group.
///
/// When the task changes group its due date becomes the destination group's
/// canonical date (`upcoming` is `today + upcoming_offset_days`). A move that
/// leaves the task where it was returns the input unchanged.
pub fn try_reorder(
    tasks: &[Task],
    mv: &MoveInstruction,
    today: NaiveDate,
    upcoming_offset_days: u32,
) -> Result<Vec<Task>, ReorderError> {
    let mut partition = Partition::of(tasks, today);

    let source_len = partition.group(mv.source_group).len();
    if mv.source_index >= source_len {
        return Err(ReorderError::InvalidIndex {
            group: mv.source_group,
            index: mv.source_index,
            len: source_len,
        });
    }

    if mv.source_group == mv.dest_group {
        // After removal the group is one shorter, so the last slot is len - 1.
        let effective_dest = mv.dest_index.min(source_len - 1);
        if effective_dest == mv.source_index {
            return Ok(tasks.to_vec());
        }
    }

    let mut task = partition.group_mut(mv.source_group).remove(mv.source_index);

    if mv.dest_group != mv.source_group {
        task.due_date = mv.dest_group.canonical_date(today, upcoming_offset_days);
    }

    let dest = partition.group_mut(mv.dest_group);
    let at = mv.dest_index.min(dest.len());
    dest.insert(at, task);

    Ok(partition.into_list())
}

/// Fail-soft variant of [`try_reorder`]: an invalid move is logged and the
/// input list comes back unchanged.
pub fn reorder(
    tasks: &[Task],
    mv: &MoveInstruction,
    today: NaiveDate,
    upcoming_offset_days: u32,
) -> Vec<Task> {
    match try_reorder(tasks, mv, today, upcoming_offset_days) {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(error = %e, ?mv, "ignoring stale move");
            tasks.to_vec()
        }
    }
}
