use crate::cmd::open_store;
use crate::output::{clip, print_json, print_table};
use clap::Subcommand;
use studio_core::board::{self, Task, TaskPatch};
use studio_core::calendar;
use studio_core::types::{Priority, TaskStatus};
use std::path::Path;

#[derive(Subcommand)]
pub enum TaskSubcommand {
    /// Add a task
    Add {
        #[arg(required = true)]
        title: Vec<String>,
        /// todo-all, todo-today, scheduled or completed
        #[arg(long, default_value = "todo-all")]
        column: TaskStatus,
    },
    /// List tasks, optionally one column
    List {
        #[arg(long)]
        column: Option<TaskStatus>,
    },
    /// Move a task to a column
    Move {
        id: String,
        column: TaskStatus,
        /// Index among the destination column's tasks
        #[arg(long)]
        position: Option<usize>,
    },
    /// Edit task fields
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// low, medium or high
        #[arg(long)]
        priority: Option<Priority>,
        /// Due day (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        #[arg(long)]
        clear_due: bool,
    },
    /// Mark a task done, or reopen it
    Toggle { id: String },
    /// Delete a task
    Delete { id: String },
}

pub fn run(root: &Path, subcmd: TaskSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TaskSubcommand::Add { title, column } => add(root, &title.join(" "), column, json),
        TaskSubcommand::List { column } => list(root, column, json),
        TaskSubcommand::Move {
            id,
            column,
            position,
        } => move_to(root, &id, column, position, json),
        TaskSubcommand::Edit {
            id,
            title,
            description,
            priority,
            due,
            clear_due,
        } => {
            let due_date = match (due, clear_due) {
                (Some(day), _) => Some(Some(calendar::parse_day(&day)?)),
                (None, true) => Some(None),
                (None, false) => None,
            };
            let patch = TaskPatch {
                title,
                description,
                priority,
                due_date,
            };
            edit(root, &id, patch, json)
        }
        TaskSubcommand::Toggle { id } => toggle(root, &id, json),
        TaskSubcommand::Delete { id } => delete(root, &id, json),
    }
}

fn add(root: &Path, title: &str, column: TaskStatus, json: bool) -> anyhow::Result<()> {
    let id = open_store(root)?
        .update::<Vec<Task>, _, _>(|tasks| board::add_task(tasks, title, column))?;

    if json {
        print_json(&serde_json::json!({ "id": id, "title": title.trim(), "status": column }))?;
    } else {
        println!("Added task [{id}] to {}: {}", column.title(), title.trim());
    }
    Ok(())
}

fn list(root: &Path, column: Option<TaskStatus>, json: bool) -> anyhow::Result<()> {
    let tasks: Vec<Task> = open_store(root)?.load()?;
    let shown: Vec<&Task> = match column {
        Some(status) => board::column(&tasks, status),
        None => tasks.iter().collect(),
    };

    if json {
        print_json(&shown)?;
        return Ok(());
    }
    if shown.is_empty() {
        println!("No tasks.");
    } else {
        let rows = shown
            .iter()
            .map(|t| {
                vec![
                    t.id.clone(),
                    clip(&t.title, 40),
                    t.status.to_string(),
                    t.priority.to_string(),
                    t.due_date.map(|d| d.to_string()).unwrap_or_default(),
                    if t.is_completed { "x" } else { "" }.to_string(),
                ]
            })
            .collect();
        print_table(&["ID", "TITLE", "COLUMN", "PRIORITY", "DUE", "DONE"], rows);
    }
    println!("\n{}", board::summarize(&tasks));
    Ok(())
}

fn move_to(
    root: &Path,
    id: &str,
    column: TaskStatus,
    position: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    open_store(root)?
        .update::<Vec<Task>, _, _>(|tasks| board::move_task(tasks, id, column, position))?;

    if json {
        print_json(&serde_json::json!({ "id": id, "status": column }))?;
    } else {
        println!("Moved task [{id}] to {}", column.title());
    }
    Ok(())
}

fn edit(root: &Path, id: &str, patch: TaskPatch, json: bool) -> anyhow::Result<()> {
    let task =
        open_store(root)?.update::<Vec<Task>, _, _>(|tasks| board::update_task(tasks, id, patch))?;

    if json {
        print_json(&task)?;
    } else {
        println!("Updated task [{id}]: {}", task.title);
    }
    Ok(())
}

fn toggle(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let task =
        open_store(root)?.update::<Vec<Task>, _, _>(|tasks| board::toggle_complete(tasks, id))?;

    if json {
        print_json(&task)?;
    } else if task.is_completed {
        println!("Completed task [{id}]: {}", task.title);
    } else {
        println!("Reopened task [{id}]: {}", task.title);
    }
    Ok(())
}

fn delete(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let task = open_store(root)?.update::<Vec<Task>, _, _>(|tasks| board::delete_task(tasks, id))?;

    if json {
        print_json(&task)?;
    } else {
        println!("Deleted task [{id}]: {}", task.title);
    }
    Ok(())
}
