use fittrack::api::routes::create_routes;
use fittrack::config::{run_migrations, AppConfig, DatabaseConfig};
use fittrack::services::{LlmConfig, NutritionConfig, SettingsService};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app_config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(app_config.log_level.clone())),
        )
        .init();

    let db_config = DatabaseConfig::from_env()?;
    let pool = db_config.create_pool().await?;
    run_migrations(&pool).await?;
    SettingsService::new(pool.clone()).ensure_defaults().await?;
    info!("database ready at {}", db_config.database_url);

    let app = create_routes(pool, LlmConfig::from_env(), NutritionConfig::from_env())?;

    let listener = TcpListener::bind(app_config.server_address()).await?;
    info!(
        "fittrack server starting on http://{}",
        app_config.server_address()
    );
    info!(
        "health check available at http://{}/health",
        app_config.server_address()
    );

    axum::serve(listener, app).await?;

    Ok(())
}
