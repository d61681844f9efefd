use crate::error::{Result, StudioError};
use crate::paths;
use crate::types::{Priority, TaskStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_completed: bool,
}

impl Task {
    pub fn new(title: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            id: paths::new_id(),
            title: title.into(),
            description: String::new(),
            status,
            priority: Priority::Medium,
            due_date: None,
            is_completed: status == TaskStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the due date.
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
}

fn double_option<'de, D>(de: D) -> std::result::Result<Option<Option<NaiveDate>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<NaiveDate>::deserialize(de).map(Some)
}

// ---------------------------------------------------------------------------
// Board operations (operate on a mutable Vec<Task>)
// ---------------------------------------------------------------------------

pub fn add_task(tasks: &mut Vec<Task>, title: &str, column: TaskStatus) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(StudioError::InvalidName("task title must not be empty".to_string()));
    }
    let task = Task::new(title, column);
    let id = task.id.clone();
    tasks.push(task);
    Ok(id)
}

/// Drop a task onto a column. Only `status` changes; `position` (index among
/// the destination column's tasks) reorders the underlying list.
pub fn move_task(
    tasks: &mut Vec<Task>,
    id: &str,
    column: TaskStatus,
    position: Option<usize>,
) -> Result<()> {
    let from = index_of(tasks, id)?;
    let mut task = tasks.remove(from);
    task.status = column;

    let insert_at = match position {
        Some(pos) => {
            let column_slots: Vec<usize> = tasks
                .iter()
                .enumerate()
                .filter(|(_, t)| t.status == column)
                .map(|(i, _)| i)
                .collect();
            match column_slots.get(pos) {
                Some(&i) => i,
                None => column_slots.last().map(|&i| i + 1).unwrap_or(tasks.len()),
            }
        }
        None => from.min(tasks.len()),
    };
    tasks.insert(insert_at, task);
    Ok(())
}

pub fn update_task(tasks: &mut [Task], id: &str, patch: TaskPatch) -> Result<Task> {
    let task = find_mut(tasks, id)?;
    if let Some(title) = patch.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(StudioError::InvalidName("task title must not be empty".to_string()));
        }
        task.title = title.to_string();
    }
    if let Some(description) = patch.description {
        task.description = description;
    }
    if let Some(priority) = patch.priority {
        task.priority = priority;
    }
    if let Some(due) = patch.due_date {
        task.due_date = due;
    }
    Ok(task.clone())
}

/// Flip completion, moving the task into or out of the completed column.
pub fn toggle_complete(tasks: &mut [Task], id: &str) -> Result<Task> {
    let task = find_mut(tasks, id)?;
    task.is_completed = !task.is_completed;
    task.status = if task.is_completed {
        TaskStatus::Completed
    } else {
        TaskStatus::TodoAll
    };
    Ok(task.clone())
}

pub fn delete_task(tasks: &mut Vec<Task>, id: &str) -> Result<Task> {
    let i = index_of(tasks, id)?;
    Ok(tasks.remove(i))
}

pub fn column(tasks: &[Task], status: TaskStatus) -> Vec<&Task> {
    tasks.iter().filter(|t| t.status == status).collect()
}

/// Task count per column, every column present.
pub fn counts(tasks: &[Task]) -> BTreeMap<TaskStatus, usize> {
    let mut counts: BTreeMap<TaskStatus, usize> =
        TaskStatus::all().iter().map(|s| (*s, 0)).collect();
    for t in tasks {
        *counts.entry(t.status).or_default() += 1;
    }
    counts
}

/// Human-readable summary: "2 to-do, 1 today, 0 scheduled, 3 completed"
pub fn summarize(tasks: &[Task]) -> String {
    let c = counts(tasks);
    format!(
        "{} to-do, {} today, {} scheduled, {} completed",
        c[&TaskStatus::TodoAll],
        c[&TaskStatus::TodoToday],
        c[&TaskStatus::Scheduled],
        c[&TaskStatus::Completed]
    )
}

fn index_of(tasks: &[Task], id: &str) -> Result<usize> {
    tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| StudioError::TaskNotFound(id.to_string()))
}

fn find_mut<'a>(tasks: &'a mut [Task], id: &str) -> Result<&'a mut Task> {
    tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| StudioError::TaskNotFound(id.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
