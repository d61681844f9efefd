use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use studio_core::board::{self, Task, TaskPatch};
use studio_core::types::TaskStatus;

use crate::error::AppError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// GET /api/tasks — every task plus per-column counts.
pub async fn list_tasks(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let tasks = app.with_store(|store| store.load::<Vec<Task>>()).await?;
    let counts = board::counts(&tasks);
    Ok(Json(serde_json::json!({
        "tasks": tasks,
        "counts": counts,
    })))
}

#[derive(Deserialize)]
pub struct AddTaskBody {
    pub title: String,
    #[serde(default = "default_column")]
    pub status: TaskStatus,
}

fn default_column() -> TaskStatus {
    TaskStatus::TodoAll
}

/// POST /api/tasks — add a task to a column.
pub async fn add_task(
    State(app): State<AppState>,
    ApiJson(body): ApiJson<AddTaskBody>,
) -> Result<Json<Task>, AppError> {
    let task = app
        .with_store(move |store| {
            store.update::<Vec<Task>, _, _>(|tasks| {
                let id = board::add_task(tasks, &body.title, body.status)?;
                find(tasks, &id)
            })
        })
        .await?;
    Ok(Json(task))
}

/// PATCH /api/tasks/{id} — edit title, description, priority or due date.
pub async fn update_task(
    State(app): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<TaskPatch>,
) -> Result<Json<Task>, AppError> {
    let task = app
        .with_store(move |store| {
            store.update::<Vec<Task>, _, _>(|tasks| board::update_task(tasks, &id, patch))
        })
        .await?;
    Ok(Json(task))
}

#[derive(Deserialize)]
pub struct MoveTaskBody {
    pub status: TaskStatus,
    #[serde(default)]
    pub position: Option<usize>,
}

/// POST /api/tasks/{id}/move — drop a task onto a column.
pub async fn move_task(
    State(app): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<MoveTaskBody>,
) -> Result<Json<Task>, AppError> {
    let task = app
        .with_store(move |store| {
            store.update::<Vec<Task>, _, _>(|tasks| {
                board::move_task(tasks, &id, body.status, body.position)?;
                find(tasks, &id)
            })
        })
        .await?;
    Ok(Json(task))
}

/// POST /api/tasks/{id}/toggle — flip completion.
pub async fn toggle_complete(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, AppError> {
    let task = app
        .with_store(move |store| {
            store.update::<Vec<Task>, _, _>(|tasks| board::toggle_complete(tasks, &id))
        })
        .await?;
    Ok(Json(task))
}

/// DELETE /api/tasks/{id} — delete a task.
pub async fn delete_task(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, AppError> {
    let task = app
        .with_store(move |store| {
            store.update::<Vec<Task>, _, _>(|tasks| board::delete_task(tasks, &id))
        })
        .await?;
    Ok(Json(task))
}

fn find(tasks: &[Task], id: &str) -> studio_core::Result<Task> {
    tasks
        .iter()
        .find(|t| t.id == id)
        .cloned()
        .ok_or_else(|| studio_core::StudioError::TaskNotFound(id.to_string()))
}
