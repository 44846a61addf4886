use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::{UpdateSettings, UserSettings};

const DEFAULT_BODY_WEIGHT_LBS: f64 = 180.0;
const DEFAULT_PROTEIN_PER_LB: f64 = 0.8;

#[derive(Clone)]
pub struct SettingsService {
    db: SqlitePool,
}

impl SettingsService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert the singleton settings row if missing. Called at startup.
    pub async fn ensure_defaults(&self) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT OR IGNORE INTO user_settings (id, body_weight_lbs, protein_per_lb, calorie_goal, updated_at)
            VALUES (1, ?, ?, NULL, ?)
            ",
        )
        .bind(DEFAULT_BODY_WEIGHT_LBS)
        .bind(DEFAULT_PROTEIN_PER_LB)
        .bind(Utc::now())
        .execute(&self.db)
        .await?;

        Ok(())
    }

    pub async fn get_settings(&self) -> AppResult<UserSettings> {
        let settings = sqlx::query_as::<_, UserSettings>(
            "SELECT id, body_weight_lbs, protein_per_lb, calorie_goal, updated_at FROM user_settings WHERE id = 1",
        )
        .fetch_optional(&self.db)
        .await?;

        match settings {
            Some(settings) => Ok(settings),
            None => {
                self.ensure_defaults().await?;
                self.get_settings_inner().await
            }
        }
    }

    pub async fn update_settings(&self, settings_data: UpdateSettings) -> AppResult<UserSettings> {
        if let Some(weight) = settings_data.body_weight_lbs {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(AppError::invalid_input("Body weight must be positive"));
            }
        }
        if let Some(factor) = settings_data.protein_per_lb {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(AppError::invalid_input(
                    "Protein factor must be positive grams per pound",
                ));
            }
        }
        if let Some(calories) = settings_data.calorie_goal {
            if !calories.is_finite() || calories <= 0.0 {
                return Err(AppError::invalid_input("Calorie goal must be positive"));
            }
        }

        self.ensure_defaults().await?;

        sqlx::query(
            r"
            UPDATE user_settings
            SET body_weight_lbs = COALESCE(?, body_weight_lbs),
                protein_per_lb = COALESCE(?, protein_per_lb),
                calorie_goal = COALESCE(?, calorie_goal),
                updated_at = ?
            WHERE id = 1
            ",
        )
        .bind(settings_data.body_weight_lbs)
        .bind(settings_data.protein_per_lb)
        .bind(settings_data.calorie_goal)
        .bind(Utc::now())
        .execute(&self.db)
        .await?;

        self.get_settings_inner().await
    }

    async fn get_settings_inner(&self) -> AppResult<UserSettings> {
        let settings = sqlx::query_as::<_, UserSettings>(
            "SELECT id, body_weight_lbs, protein_per_lb, calorie_goal, updated_at FROM user_settings WHERE id = 1",
        )
        .fetch_one(&self.db)
        .await?;

        Ok(settings)
    }
}
