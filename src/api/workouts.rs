use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::{CreateWorkoutEntry, UpdateWorkoutEntry, WorkoutComparison, WorkoutEntry};
use crate::services::workout_service::WorkoutFilter;
use crate::services::WorkoutService;

#[derive(Debug, Deserialize)]
pub struct WorkoutListQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category_id: Option<i64>,
    pub exercise: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub exercise: String,
    pub date: NaiveDate,
}

#[derive(Clone)]
pub struct WorkoutsState {
    pub workout_service: WorkoutService,
}

pub fn workout_routes(db: SqlitePool) -> Router {
    let shared_state = WorkoutsState {
        workout_service: WorkoutService::new(db),
    };

    Router::new()
        .route("/", get(list_workouts).post(create_workout))
        .route("/compare", get(compare_workouts))
        .route(
            "/:entry_id",
            get(get_workout).put(update_workout).delete(delete_workout),
        )
        .with_state(shared_state)
}

pub async fn create_workout(
    State(state): State<WorkoutsState>,
    Json(request): Json<CreateWorkoutEntry>,
) -> AppResult<Json<WorkoutEntry>> {
    let entry = state.workout_service.create_entry(request).await?;
    tracing::info!("logged workout '{}' on {}", entry.exercise, entry.date);
    Ok(Json(entry))
}

pub async fn list_workouts(
    State(state): State<WorkoutsState>,
    Query(query): Query<WorkoutListQuery>,
) -> AppResult<Json<Vec<WorkoutEntry>>> {
    let pagination = super::PaginationQuery {
        limit: query.limit,
        offset: query.offset,
    };
    let filter = WorkoutFilter {
        from: query.from,
        to: query.to,
        category_id: query.category_id,
        exercise: query.exercise,
    };
    let entries = state
        .workout_service
        .get_entries(filter, pagination.get_limit(), pagination.get_offset())
        .await?;
    Ok(Json(entries))
}

pub async fn get_workout(
    State(state): State<WorkoutsState>,
    Path(entry_id): Path<i64>,
) -> AppResult<Json<WorkoutEntry>> {
    let entry = state
        .workout_service
        .get_entry_by_id(entry_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Workout entry {entry_id} not found")))?;
    Ok(Json(entry))
}

pub async fn update_workout(
    State(state): State<WorkoutsState>,
    Path(entry_id): Path<i64>,
    Json(request): Json<UpdateWorkoutEntry>,
) -> AppResult<Json<WorkoutEntry>> {
    let entry = state
        .workout_service
        .update_entry(entry_id, request)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Workout entry {entry_id} not found")))?;
    Ok(Json(entry))
}

pub async fn delete_workout(
    State(state): State<WorkoutsState>,
    Path(entry_id): Path<i64>,
) -> AppResult<Json<Value>> {
    if !state.workout_service.delete_entry(entry_id).await? {
        return Err(AppError::not_found(format!("Workout entry {entry_id} not found")));
    }
    tracing::info!("deleted workout entry {entry_id}");
    Ok(Json(json!({
        "success": true,
        "message": "Workout entry deleted successfully"
    })))
}

/// Week-over-week progress check for one exercise.
pub async fn compare_workouts(
    State(state): State<WorkoutsState>,
    Query(query): Query<CompareQuery>,
) -> AppResult<Json<WorkoutComparison>> {
    let comparison = state
        .workout_service
        .compare_week_over_week(&query.exercise, query.date)
        .await?;
    Ok(Json(comparison))
}
