use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::error::AppResult;
use crate::models::{DailySummary, HistorySummary};
use crate::services::SummaryService;

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    /// Defaults to today when omitted
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Clone)]
pub struct SummaryState {
    pub summary_service: SummaryService,
}

pub fn summary_routes(db: SqlitePool) -> Router {
    let shared_state = SummaryState {
        summary_service: SummaryService::new(db),
    };

    Router::new()
        .route("/daily", get(get_daily_summary))
        .route("/history", get(get_history))
        .with_state(shared_state)
}

pub async fn get_daily_summary(
    State(state): State<SummaryState>,
    Query(query): Query<DailyQuery>,
) -> AppResult<Json<DailySummary>> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let summary = state.summary_service.daily_summary(date).await?;
    Ok(Json(summary))
}

pub async fn get_history(
    State(state): State<SummaryState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<HistorySummary>> {
    let history = state.summary_service.history(query.from, query.to).await?;
    Ok(Json(history))
}
