use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use studio_core::calendar::{self, Calendar};
use studio_core::content::ContentItem;

use crate::error::AppError;
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

/// GET /api/calendar — `{ ready, scheduled }`.
pub async fn get_calendar(State(app): State<AppState>) -> Result<Json<Calendar>, AppError> {
    let cal = app.with_store(|store| store.load::<Calendar>()).await?;
    Ok(Json(cal))
}

#[derive(Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

/// GET /api/calendar/month?year=&month= — scheduled items keyed by day.
pub async fn get_month(
    State(app): State<AppState>,
    ApiQuery(q): ApiQuery<MonthQuery>,
) -> Result<Json<BTreeMap<String, Vec<ContentItem>>>, AppError> {
    let days = app
        .with_store(move |store| {
            let cal: Calendar = store.load()?;
            let days: BTreeMap<String, Vec<ContentItem>> = cal
                .month(q.year, q.month)?
                .into_iter()
                .map(|(day, items)| (day.to_string(), items.into_iter().cloned().collect()))
                .collect();
            Ok(days)
        })
        .await?;
    Ok(Json(days))
}

#[derive(Deserialize)]
pub struct OverdueQuery {
    #[serde(default)]
    pub today: Option<String>,
}

/// GET /api/calendar/overdue — scheduled items dated before today.
pub async fn get_overdue(
    State(app): State<AppState>,
    ApiQuery(q): ApiQuery<OverdueQuery>,
) -> Result<Json<Vec<ContentItem>>, AppError> {
    let today = match q.today.as_deref() {
        Some(day) => calendar::parse_day(day)?,
        None => chrono::Local::now().date_naive(),
    };
    let items = app
        .with_store(move |store| {
            let cal: Calendar = store.load()?;
            let items: Vec<ContentItem> = cal.overdue(today).into_iter().cloned().collect();
            Ok(items)
        })
        .await?;
    Ok(Json(items))
}

#[derive(Deserialize)]
pub struct ScheduleBody {
    pub date: String,
}

/// POST /api/calendar/{id}/schedule — drop an item on a day. Moves it out of
/// the ready list, or to a new day if already scheduled.
pub async fn schedule(
    State(app): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ScheduleBody>,
) -> Result<Json<Calendar>, AppError> {
    let date = calendar::parse_day(&body.date)?;
    let cal = app
        .with_store(move |store| {
            store.update::<Calendar, _, _>(|cal| {
                cal.schedule(&id, date)?;
                Ok(cal.clone())
            })
        })
        .await?;
    Ok(Json(cal))
}

/// POST /api/calendar/{id}/unschedule — return an item to the ready list.
pub async fn unschedule(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Calendar>, AppError> {
    let cal = app
        .with_store(move |store| {
            store.update::<Calendar, _, _>(|cal| {
                cal.unschedule(&id)?;
                Ok(cal.clone())
            })
        })
        .await?;
    Ok(Json(cal))
}

/// DELETE /api/calendar/{id} — take an item off the calendar entirely.
pub async fn remove(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContentItem>, AppError> {
    let item = app
        .with_store(move |store| store.update::<Calendar, _, _>(|cal| cal.remove(&id)))
        .await?;
    Ok(Json(item))
}
