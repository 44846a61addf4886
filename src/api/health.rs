use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::{json, Value};
use sqlx::SqlitePool;

pub fn health_routes(db: SqlitePool) -> Router {
    Router::new().route("/health", get(health_check)).with_state(db)
}

pub async fn health_check(State(db): State<SqlitePool>) -> Json<Value> {
    let database = match sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(&db).await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::error!("health check database ping failed: {e}");
            "error"
        }
    };

    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
    }))
}
