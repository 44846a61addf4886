use axum::{extract::State, response::Json, routing::get, Router};
use sqlx::SqlitePool;

use crate::error::AppResult;
use crate::models::{SettingsResponse, UpdateSettings};
use crate::services::SettingsService;

#[derive(Clone)]
pub struct SettingsState {
    pub settings_service: SettingsService,
}

pub fn settings_routes(db: SqlitePool) -> Router {
    let shared_state = SettingsState {
        settings_service: SettingsService::new(db),
    };

    Router::new()
        .route("/", get(get_settings).put(update_settings))
        .with_state(shared_state)
}

pub async fn get_settings(State(state): State<SettingsState>) -> AppResult<Json<SettingsResponse>> {
    let settings = state.settings_service.get_settings().await?;
    Ok(Json(settings.into()))
}

pub async fn update_settings(
    State(state): State<SettingsState>,
    Json(request): Json<UpdateSettings>,
) -> AppResult<Json<SettingsResponse>> {
    let settings = state.settings_service.update_settings(request).await?;
    tracing::info!(
        "updated settings: body weight {} lbs, protein goal {} g",
        settings.body_weight_lbs,
        settings.protein_goal()
    );
    Ok(Json(settings.into()))
}
