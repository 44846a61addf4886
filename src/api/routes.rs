use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::categories::category_routes;
use super::health::health_routes;
use super::meals::meal_routes;
use super::nutrition::nutrition_routes;
use super::settings::settings_routes;
use super::summary::summary_routes;
use super::templates::template_routes;
use super::workouts::workout_routes;
use crate::error::AppResult;
use crate::services::{LlmConfig, NutritionClient, NutritionConfig, NutritionEstimator, OpenAiEstimator};

pub fn create_routes(
    db: SqlitePool,
    llm_config: LlmConfig,
    nutrition_config: NutritionConfig,
) -> AppResult<Router> {
    let estimator: Option<Arc<dyn NutritionEstimator>> = if llm_config.is_configured() {
        Some(Arc::new(OpenAiEstimator::new(llm_config)?))
    } else {
        tracing::warn!("LLM_API_KEY not set; meal parsing endpoint disabled");
        None
    };

    let nutrition_client = Arc::new(NutritionClient::new(nutrition_config)?);

    let router = Router::new()
        .merge(health_routes(db.clone()))
        .nest("/api/meals", meal_routes(db.clone(), estimator))
        .nest("/api/templates", template_routes(db.clone()))
        .nest("/api/workouts", workout_routes(db.clone()))
        .nest("/api/categories", category_routes(db.clone()))
        .nest("/api/settings", settings_routes(db.clone()))
        .nest("/api/summary", summary_routes(db))
        .nest("/api/nutrition", nutrition_routes(nutrition_client))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    Ok(router)
}
