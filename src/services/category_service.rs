use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::{CategoryWithCount, CreateCategory, UpdateCategory, WorkoutCategory};

#[derive(Clone)]
pub struct CategoryService {
    db: SqlitePool,
}

impl CategoryService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create_category(&self, category_data: CreateCategory) -> AppResult<WorkoutCategory> {
        if category_data.name.trim().is_empty() {
            return Err(AppError::invalid_input("Category name cannot be empty"));
        }
        if self.name_exists(&category_data.name, None).await? {
            return Err(AppError::conflict(format!(
                "Category '{}' already exists",
                category_data.name
            )));
        }

        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO workout_categories (name, description, created_at) VALUES (?, ?, ?)",
        )
        .bind(&category_data.name)
        .bind(&category_data.description)
        .bind(now)
        .execute(&self.db)
        .await?;

        Ok(WorkoutCategory {
            id: result.last_insert_rowid(),
            name: category_data.name,
            description: category_data.description,
            created_at: now,
        })
    }

    pub async fn get_category_by_id(&self, category_id: i64) -> AppResult<Option<WorkoutCategory>> {
        let category = sqlx::query_as::<_, WorkoutCategory>(
            "SELECT id, name, description, created_at FROM workout_categories WHERE id = ?",
        )
        .bind(category_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(category)
    }

    pub async fn get_categories(&self) -> AppResult<Vec<CategoryWithCount>> {
        let categories = sqlx::query_as::<_, CategoryWithCount>(
            r"
            SELECT c.id, c.name, c.description, c.created_at, COUNT(w.id) AS workout_count
            FROM workout_categories c
            LEFT JOIN workout_entries w ON w.category_id = c.id
            GROUP BY c.id
            ORDER BY c.name ASC
            ",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }

    pub async fn update_category(
        &self,
        category_id: i64,
        category_data: UpdateCategory,
    ) -> AppResult<Option<WorkoutCategory>> {
        if let Some(name) = &category_data.name {
            if name.trim().is_empty() {
                return Err(AppError::invalid_input("Category name cannot be empty"));
            }
            if self.name_exists(name, Some(category_id)).await? {
                return Err(AppError::conflict(format!("Category '{name}' already exists")));
            }
        }

        let result = sqlx::query(
            r"
            UPDATE workout_categories
            SET name = COALESCE(?, name),
                description = COALESCE(?, description)
            WHERE id = ?
            ",
        )
        .bind(category_data.name)
        .bind(category_data.description)
        .bind(category_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_category_by_id(category_id).await
    }

    /// Workouts in a deleted category are kept and become uncategorized
    /// (FK is ON DELETE SET NULL).
    pub async fn delete_category(&self, category_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM workout_categories WHERE id = ?")
            .bind(category_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn name_exists(&self, name: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM workout_categories WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.db)
                .await?;

        Ok(match (existing, exclude_id) {
            (Some(found), Some(excluded)) => found != excluded,
            (Some(_), None) => true,
            (None, _) => false,
        })
    }
}
