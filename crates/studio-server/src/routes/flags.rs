use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use studio_core::flags::FeatureFlags;

use crate::error::AppError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// GET /api/flags — every known flag and its value.
pub async fn list_flags(State(app): State<AppState>) -> Result<Json<FeatureFlags>, AppError> {
    let flags = app.with_store(|store| store.load::<FeatureFlags>()).await?;
    Ok(Json(flags))
}

#[derive(Deserialize)]
pub struct FlagBody {
    pub enabled: bool,
}

/// PUT /api/flags/{name} — enable or disable a flag.
pub async fn set_flag(
    State(app): State<AppState>,
    Path(name): Path<String>,
    ApiJson(body): ApiJson<FlagBody>,
) -> Result<Json<FeatureFlags>, AppError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::bad_request("flag name must not be empty"));
    }
    let flags = app
        .with_store(move |store| {
            store.update::<FeatureFlags, _, _>(|flags| {
                if body.enabled {
                    flags.enable(name);
                } else {
                    flags.disable(name);
                }
                Ok(flags.clone())
            })
        })
        .await?;
    Ok(Json(flags))
}
