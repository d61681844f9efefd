use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use studio_core::ideas::IdeaTable;

use crate::error::AppError;
use crate::extract::ApiJson;
use crate::state::AppState;

// Every mutation returns the whole table; it is small and the UI redraws it
// wholesale.

/// GET /api/ideas — the ideation table.
pub async fn get_table(State(app): State<AppState>) -> Result<Json<IdeaTable>, AppError> {
    let table = app.with_store(|store| store.load::<IdeaTable>()).await?;
    Ok(Json(table))
}

async fn mutate<F>(app: &AppState, f: F) -> Result<Json<IdeaTable>, AppError>
where
    F: FnOnce(&mut IdeaTable) -> studio_core::Result<()> + Send + 'static,
{
    let table = app
        .with_store(move |store| {
            store.update::<IdeaTable, _, _>(|table| {
                f(table)?;
                Ok(table.clone())
            })
        })
        .await?;
    Ok(Json(table))
}

#[derive(Deserialize)]
pub struct NameBody {
    pub name: String,
}

/// POST /api/ideas/columns — add a custom column.
pub async fn add_column(
    State(app): State<AppState>,
    ApiJson(body): ApiJson<NameBody>,
) -> Result<Json<IdeaTable>, AppError> {
    mutate(&app, move |t| t.add_column(&body.name).map(drop)).await
}

/// PUT /api/ideas/columns/{id} — rename a column.
pub async fn rename_column(
    State(app): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<NameBody>,
) -> Result<Json<IdeaTable>, AppError> {
    mutate(&app, move |t| t.rename_column(&id, &body.name)).await
}

/// DELETE /api/ideas/columns/{id} — delete a column and its cells.
pub async fn delete_column(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<IdeaTable>, AppError> {
    mutate(&app, move |t| t.delete_column(&id).map(drop)).await
}

/// POST /api/ideas/rows — append an empty row.
pub async fn add_row(State(app): State<AppState>) -> Result<Json<IdeaTable>, AppError> {
    mutate(&app, |t| {
        t.add_row();
        Ok(())
    })
    .await
}

/// DELETE /api/ideas/rows/{id} — delete a row.
pub async fn delete_row(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<IdeaTable>, AppError> {
    mutate(&app, move |t| t.delete_row(&id).map(drop)).await
}

#[derive(Deserialize)]
pub struct CellBody {
    pub text: String,
}

/// PUT /api/ideas/rows/{id}/cells/{column_id} — set cell text; empty clears.
pub async fn set_cell(
    State(app): State<AppState>,
    Path((row_id, column_id)): Path<(String, String)>,
    ApiJson(body): ApiJson<CellBody>,
) -> Result<Json<IdeaTable>, AppError> {
    mutate(&app, move |t| t.set_cell(&row_id, &column_id, body.text)).await
}

/// POST /api/ideas/rows/{id}/pin — pin a row (at most five).
pub async fn pin_row(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<IdeaTable>, AppError> {
    mutate(&app, move |t| t.pin(&id)).await
}

/// DELETE /api/ideas/rows/{id}/pin — unpin a row.
pub async fn unpin_row(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<IdeaTable>, AppError> {
    mutate(&app, move |t| {
        t.unpin(&id);
        Ok(())
    })
    .await
}
