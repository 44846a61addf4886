// Application configuration

pub mod app;
pub mod database;

pub use app::AppConfig;
pub use database::{run_migrations, DatabaseConfig};
