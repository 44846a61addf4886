use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::AppResult;
use crate::services::{IngredientInfo, NutritionClient};

#[derive(Debug, Deserialize)]
pub struct IngredientSearchQuery {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct IngredientSearchResponse {
    pub query: String,
    pub results: Vec<IngredientInfo>,
}

pub fn nutrition_routes(client: Arc<NutritionClient>) -> Router {
    Router::new()
        .route("/search", get(search_ingredients))
        .with_state(client)
}

/// Look up an ingredient in the wger food database.
pub async fn search_ingredients(
    State(client): State<Arc<NutritionClient>>,
    Query(query): Query<IngredientSearchQuery>,
) -> AppResult<Json<IngredientSearchResponse>> {
    let results = client.search(&query.query).await?;
    Ok(Json(IngredientSearchResponse {
        query: query.query,
        results,
    }))
}
