use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{
    CreateMealEntry, MealEntry, ParseMealRequest, ParseMealResponse, UpdateMealEntry,
};
use crate::services::{MealService, NutritionEstimator};

#[derive(Debug, Deserialize)]
pub struct MealListQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Clone)]
pub struct MealsState {
    pub meal_service: MealService,
    pub estimator: Option<Arc<dyn NutritionEstimator>>,
}

pub fn meal_routes(db: SqlitePool, estimator: Option<Arc<dyn NutritionEstimator>>) -> Router {
    let shared_state = MealsState {
        meal_service: MealService::new(db),
        estimator,
    };

    Router::new()
        .route("/", get(list_meals).post(create_meal))
        .route("/parse", post(parse_meal))
        .route("/:entry_id", get(get_meal).put(update_meal).delete(delete_meal))
        .with_state(shared_state)
}

pub async fn create_meal(
    State(state): State<MealsState>,
    Json(request): Json<CreateMealEntry>,
) -> AppResult<Json<MealEntry>> {
    let entry = state.meal_service.create_entry(request).await?;
    tracing::info!("logged meal '{}' on {}", entry.name, entry.date);
    Ok(Json(entry))
}

pub async fn list_meals(
    State(state): State<MealsState>,
    Query(query): Query<MealListQuery>,
) -> AppResult<Json<Vec<MealEntry>>> {
    let pagination = super::PaginationQuery {
        limit: query.limit,
        offset: query.offset,
    };
    let entries = state
        .meal_service
        .get_entries(query.from, query.to, pagination.get_limit(), pagination.get_offset())
        .await?;
    Ok(Json(entries))
}

pub async fn get_meal(
    State(state): State<MealsState>,
    Path(entry_id): Path<i64>,
) -> AppResult<Json<MealEntry>> {
    let entry = state
        .meal_service
        .get_entry_by_id(entry_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Meal entry {entry_id} not found")))?;
    Ok(Json(entry))
}

pub async fn update_meal(
    State(state): State<MealsState>,
    Path(entry_id): Path<i64>,
    Json(request): Json<UpdateMealEntry>,
) -> AppResult<Json<MealEntry>> {
    let entry = state
        .meal_service
        .update_entry(entry_id, request)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Meal entry {entry_id} not found")))?;
    Ok(Json(entry))
}

pub async fn delete_meal(
    State(state): State<MealsState>,
    Path(entry_id): Path<i64>,
) -> AppResult<Json<Value>> {
    if !state.meal_service.delete_entry(entry_id).await? {
        return Err(AppError::not_found(format!("Meal entry {entry_id} not found")));
    }
    tracing::info!("deleted meal entry {entry_id}");
    Ok(Json(json!({
        "success": true,
        "message": "Meal entry deleted successfully"
    })))
}

/// Parse a free-text meal description into a structured nutrition estimate,
/// optionally logging it in the same request.
pub async fn parse_meal(
    State(state): State<MealsState>,
    Json(request): Json<ParseMealRequest>,
) -> AppResult<Json<ParseMealResponse>> {
    let estimator = state.estimator.as_ref().ok_or(AppError::LlmUnavailable)?;
    let estimate = estimator.estimate(&request.description).await?;

    let entry = if request.save {
        let entry = state
            .meal_service
            .create_entry(CreateMealEntry {
                date: request.date,
                name: estimate.name.clone(),
                protein_grams: estimate.protein_grams,
                calories: estimate.calories,
                // keep the original description for later reference
                notes: Some(request.description.trim().to_string()),
            })
            .await?;
        tracing::info!("logged parsed meal '{}' on {}", entry.name, entry.date);
        Some(entry)
    } else {
        None
    };

    Ok(Json(ParseMealResponse { estimate, entry }))
}
