use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::{CategoryWithCount, CreateCategory, UpdateCategory, WorkoutCategory};
use crate::services::CategoryService;

#[derive(Clone)]
pub struct CategoriesState {
    pub category_service: CategoryService,
}

pub fn category_routes(db: SqlitePool) -> Router {
    let shared_state = CategoriesState {
        category_service: CategoryService::new(db),
    };

    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:category_id",
            get(get_category).put(update_category).delete(delete_category),
        )
        .with_state(shared_state)
}

pub async fn create_category(
    State(state): State<CategoriesState>,
    Json(request): Json<CreateCategory>,
) -> AppResult<Json<WorkoutCategory>> {
    let category = state.category_service.create_category(request).await?;
    tracing::info!("created workout category '{}'", category.name);
    Ok(Json(category))
}

pub async fn list_categories(
    State(state): State<CategoriesState>,
) -> AppResult<Json<Vec<CategoryWithCount>>> {
    let categories = state.category_service.get_categories().await?;
    Ok(Json(categories))
}

pub async fn get_category(
    State(state): State<CategoriesState>,
    Path(category_id): Path<i64>,
) -> AppResult<Json<WorkoutCategory>> {
    let category = state
        .category_service
        .get_category_by_id(category_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {category_id} not found")))?;
    Ok(Json(category))
}

pub async fn update_category(
    State(state): State<CategoriesState>,
    Path(category_id): Path<i64>,
    Json(request): Json<UpdateCategory>,
) -> AppResult<Json<WorkoutCategory>> {
    let category = state
        .category_service
        .update_category(category_id, request)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {category_id} not found")))?;
    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<CategoriesState>,
    Path(category_id): Path<i64>,
) -> AppResult<Json<Value>> {
    if !state.category_service.delete_category(category_id).await? {
        return Err(AppError::not_found(format!("Category {category_id} not found")));
    }
    tracing::info!("deleted workout category {category_id}");
    Ok(Json(json!({
        "success": true,
        "message": "Category deleted; its workouts are now uncategorized"
    })))
}
