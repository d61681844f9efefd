use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use studio_core::goal::{self, Goal};
use studio_core::types::GoalStatus;

use crate::error::AppError;
use crate::extract::ApiJson;
use crate::state::AppState;

fn listing(goals: &[Goal]) -> serde_json::Value {
    serde_json::json!({
        "goals": goals,
        "progress": goal::progress(goals),
    })
}

/// GET /api/goals — goals plus completion ratio.
pub async fn list_goals(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let goals = app.with_store(|store| store.load::<Vec<Goal>>()).await?;
    Ok(Json(listing(&goals)))
}

async fn mutate<F>(app: &AppState, f: F) -> Result<Json<serde_json::Value>, AppError>
where
    F: FnOnce(&mut Vec<Goal>) -> studio_core::Result<()> + Send + 'static,
{
    let goals = app
        .with_store(move |store| {
            store.update::<Vec<Goal>, _, _>(|goals| {
                f(goals)?;
                Ok(goals.clone())
            })
        })
        .await?;
    Ok(Json(listing(&goals)))
}

#[derive(Deserialize)]
pub struct AddGoalBody {
    pub text: String,
}

/// POST /api/goals — add a goal.
pub async fn add_goal(
    State(app): State<AppState>,
    ApiJson(body): ApiJson<AddGoalBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    mutate(&app, move |goals| goal::add_goal(goals, &body.text).map(drop)).await
}

#[derive(Deserialize)]
pub struct StatusBody {
    pub status: GoalStatus,
}

/// PUT /api/goals/{id}/status
pub async fn set_status(
    State(app): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StatusBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    mutate(&app, move |goals| goal::set_status(goals, &id, body.status)).await
}

#[derive(Deserialize)]
pub struct LinkBody {
    #[serde(alias = "targetId", alias = "target_id")]
    pub target: String,
}

/// PUT /api/goals/{id}/link — link to another goal.
pub async fn link_goal(
    State(app): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<LinkBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    mutate(&app, move |goals| goal::link(goals, &id, &body.target)).await
}

/// DELETE /api/goals/{id}/link
pub async fn unlink_goal(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    mutate(&app, move |goals| goal::unlink(goals, &id)).await
}

/// DELETE /api/goals/{id} — delete a goal and links pointing at it.
pub async fn delete_goal(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    mutate(&app, move |goals| goal::delete_goal(goals, &id).map(drop)).await
}
