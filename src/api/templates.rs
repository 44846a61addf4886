use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::{
    CreateMealTemplate, LogTemplateRequest, MealEntry, MealTemplate, UpdateMealTemplate,
};
use crate::services::TemplateService;

#[derive(Clone)]
pub struct TemplatesState {
    pub template_service: TemplateService,
}

pub fn template_routes(db: SqlitePool) -> Router {
    let shared_state = TemplatesState {
        template_service: TemplateService::new(db),
    };

    Router::new()
        .route("/", get(list_templates).post(create_template))
        .route(
            "/:template_id",
            get(get_template).put(update_template).delete(delete_template),
        )
        .route("/:template_id/log", post(log_template))
        .with_state(shared_state)
}

pub async fn create_template(
    State(state): State<TemplatesState>,
    Json(request): Json<CreateMealTemplate>,
) -> AppResult<Json<MealTemplate>> {
    let template = state.template_service.create_template(request).await?;
    tracing::info!("created meal template '{}'", template.name);
    Ok(Json(template))
}

pub async fn list_templates(
    State(state): State<TemplatesState>,
) -> AppResult<Json<Vec<MealTemplate>>> {
    let templates = state.template_service.get_templates().await?;
    Ok(Json(templates))
}

pub async fn get_template(
    State(state): State<TemplatesState>,
    Path(template_id): Path<i64>,
) -> AppResult<Json<MealTemplate>> {
    let template = state
        .template_service
        .get_template_by_id(template_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Template {template_id} not found")))?;
    Ok(Json(template))
}

pub async fn update_template(
    State(state): State<TemplatesState>,
    Path(template_id): Path<i64>,
    Json(request): Json<UpdateMealTemplate>,
) -> AppResult<Json<MealTemplate>> {
    let template = state
        .template_service
        .update_template(template_id, request)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Template {template_id} not found")))?;
    Ok(Json(template))
}

pub async fn delete_template(
    State(state): State<TemplatesState>,
    Path(template_id): Path<i64>,
) -> AppResult<Json<Value>> {
    if !state.template_service.delete_template(template_id).await? {
        return Err(AppError::not_found(format!("Template {template_id} not found")));
    }
    tracing::info!("deleted meal template {template_id}");
    Ok(Json(json!({
        "success": true,
        "message": "Template deleted successfully"
    })))
}

/// Log a meal entry from a saved template (quick re-entry).
pub async fn log_template(
    State(state): State<TemplatesState>,
    Path(template_id): Path<i64>,
    request: Option<Json<LogTemplateRequest>>,
) -> AppResult<Json<MealEntry>> {
    let date = request.and_then(|Json(body)| body.date);
    let entry = state
        .template_service
        .log_template(template_id, date)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Template {template_id} not found")))?;
    tracing::info!("logged meal '{}' from template {template_id}", entry.name);
    Ok(Json(entry))
}
