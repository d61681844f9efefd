use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use studio_core::calendar::{self, Calendar};
use studio_core::content::{self, ContentBlob, ContentItem, ContentPatch, Pillar};
use studio_core::StudioError;

use crate::error::AppError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// GET /api/pillars — all pillars with their content.
pub async fn list_pillars(State(app): State<AppState>) -> Result<Json<Vec<Pillar>>, AppError> {
    let pillars = app.with_store(|store| store.load::<Vec<Pillar>>()).await?;
    Ok(Json(pillars))
}

#[derive(Deserialize)]
pub struct NameBody {
    pub name: String,
}

/// POST /api/pillars — create a pillar.
pub async fn create_pillar(
    State(app): State<AppState>,
    ApiJson(body): ApiJson<NameBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = app
        .with_store(move |store| {
            store.update::<Vec<Pillar>, _, _>(|pillars| content::create_pillar(pillars, &body.name))
        })
        .await?;
    Ok(Json(serde_json::json!({ "id": id })))
}

/// PUT /api/pillars/{id} — rename a pillar.
pub async fn rename_pillar(
    State(app): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<NameBody>,
) -> Result<Json<Pillar>, AppError> {
    let pillar = app
        .with_store(move |store| {
            store.update::<Vec<Pillar>, _, _>(|pillars| {
                content::rename_pillar(pillars, &id, &body.name)?;
                pillars
                    .iter()
                    .find(|p| p.id == id)
                    .cloned()
                    .ok_or_else(|| StudioError::PillarNotFound(id.clone()))
            })
        })
        .await?;
    Ok(Json(pillar))
}

/// DELETE /api/pillars/{id} — delete a pillar and its content.
pub async fn delete_pillar(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Pillar>, AppError> {
    let removed = app
        .with_store(move |store| {
            store.update::<Vec<Pillar>, _, _>(|pillars| content::delete_pillar(pillars, &id))
        })
        .await?;
    Ok(Json(removed))
}

#[derive(Deserialize)]
pub struct AddContentBody {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub blob: Option<ContentBlob>,
}

/// POST /api/pillars/{id}/content — add a content item.
pub async fn add_content(
    State(app): State<AppState>,
    Path(pillar_id): Path<String>,
    ApiJson(body): ApiJson<AddContentBody>,
) -> Result<Json<ContentItem>, AppError> {
    let item = app
        .with_store(move |store| {
            let mut item = ContentItem::new(body.title);
            item.description = body.description;
            item.format = body.format;
            item.tags = body.tags;
            item.platforms = body.platforms;
            if let Some(blob) = &body.blob {
                item.set_blob(blob)?;
            }
            store.update::<Vec<Pillar>, _, _>(|pillars| {
                let id = content::add_content(pillars, &pillar_id, item)?;
                content::find_content(pillars, &pillar_id, &id).cloned()
            })
        })
        .await?;
    Ok(Json(item))
}

/// PATCH /api/pillars/{id}/content/{content_id} — partial update.
pub async fn update_content(
    State(app): State<AppState>,
    Path((pillar_id, content_id)): Path<(String, String)>,
    ApiJson(patch): ApiJson<ContentPatch>,
) -> Result<Json<ContentItem>, AppError> {
    let item = app
        .with_store(move |store| {
            store.update::<Vec<Pillar>, _, _>(|pillars| {
                content::update_content(pillars, &pillar_id, &content_id, patch)
            })
        })
        .await?;
    Ok(Json(item))
}

/// DELETE /api/pillars/{id}/content/{content_id} — remove a content item.
pub async fn remove_content(
    State(app): State<AppState>,
    Path((pillar_id, content_id)): Path<(String, String)>,
) -> Result<Json<ContentItem>, AppError> {
    let item = app
        .with_store(move |store| {
            store.update::<Vec<Pillar>, _, _>(|pillars| {
                content::remove_content(pillars, &pillar_id, &content_id)
            })
        })
        .await?;
    Ok(Json(item))
}

#[derive(Deserialize)]
pub struct MoveBody {
    #[serde(alias = "toPillarId", alias = "to_pillar_id")]
    pub to: String,
}

/// POST /api/pillars/{id}/content/{content_id}/move — move to another pillar.
pub async fn move_content(
    State(app): State<AppState>,
    Path((pillar_id, content_id)): Path<(String, String)>,
    ApiJson(body): ApiJson<MoveBody>,
) -> Result<Json<ContentItem>, AppError> {
    let item = app
        .with_store(move |store| {
            store.update::<Vec<Pillar>, _, _>(|pillars| {
                content::move_content(pillars, &pillar_id, &body.to, &content_id)?;
                content::find_content(pillars, &body.to, &content_id).cloned()
            })
        })
        .await?;
    Ok(Json(item))
}

/// POST /api/pillars/{id}/content/{content_id}/send-to-calendar — copy the
/// item onto the calendar's ready list.
pub async fn send_to_calendar(
    State(app): State<AppState>,
    Path((pillar_id, content_id)): Path<(String, String)>,
) -> Result<Json<Calendar>, AppError> {
    let cal = app
        .with_store(move |store| {
            let pillars: Vec<Pillar> = store.load()?;
            store.update::<Calendar, _, _>(|cal| {
                calendar::send_to_calendar(&pillars, cal, &pillar_id, &content_id)?;
                Ok(cal.clone())
            })
        })
        .await?;
    Ok(Json(cal))
}
