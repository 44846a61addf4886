use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::{CreateMealTemplate, MealEntry, MealTemplate, UpdateMealTemplate};

const TEMPLATE_COLUMNS: &str =
    "id, name, protein_grams, calories, notes, times_used, created_at, updated_at";

#[derive(Clone)]
pub struct TemplateService {
    db: SqlitePool,
}

impl TemplateService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create_template(
        &self,
        template_data: CreateMealTemplate,
    ) -> AppResult<MealTemplate> {
        if template_data.name.trim().is_empty() {
            return Err(AppError::invalid_input("Template name cannot be empty"));
        }
        if !template_data.protein_grams.is_finite() || template_data.protein_grams < 0.0 {
            return Err(AppError::invalid_input("Protein cannot be negative"));
        }
        if self.name_exists(&template_data.name, None).await? {
            return Err(AppError::conflict(format!(
                "Template '{}' already exists",
                template_data.name
            )));
        }

        let now = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO meal_templates (name, protein_grams, calories, notes, times_used, created_at, updated_at)
            VALUES (?, ?, ?, ?, 0, ?, ?)
            ",
        )
        .bind(&template_data.name)
        .bind(template_data.protein_grams)
        .bind(template_data.calories)
        .bind(&template_data.notes)
        .bind(now)
        .bind(now)
        .execute(&self.db)
        .await?;

        Ok(MealTemplate {
            id: result.last_insert_rowid(),
            name: template_data.name,
            protein_grams: template_data.protein_grams,
            calories: template_data.calories,
            notes: template_data.notes,
            times_used: 0,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_template_by_id(&self, template_id: i64) -> AppResult<Option<MealTemplate>> {
        let template = sqlx::query_as::<_, MealTemplate>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM meal_templates WHERE id = ?"
        ))
        .bind(template_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(template)
    }

    /// Most-used templates first so frequent meals surface at the top.
    pub async fn get_templates(&self) -> AppResult<Vec<MealTemplate>> {
        let templates = sqlx::query_as::<_, MealTemplate>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM meal_templates ORDER BY times_used DESC, name ASC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(templates)
    }

    pub async fn update_template(
        &self,
        template_id: i64,
        template_data: UpdateMealTemplate,
    ) -> AppResult<Option<MealTemplate>> {
        if let Some(name) = &template_data.name {
            if name.trim().is_empty() {
                return Err(AppError::invalid_input("Template name cannot be empty"));
            }
            if self.name_exists(name, Some(template_id)).await? {
                return Err(AppError::conflict(format!("Template '{name}' already exists")));
            }
        }
        if let Some(protein) = template_data.protein_grams {
            if !protein.is_finite() || protein < 0.0 {
                return Err(AppError::invalid_input("Protein cannot be negative"));
            }
        }

        let result = sqlx::query(
            r"
            UPDATE meal_templates
            SET name = COALESCE(?, name),
                protein_grams = COALESCE(?, protein_grams),
                calories = COALESCE(?, calories),
                notes = COALESCE(?, notes),
                updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(template_data.name)
        .bind(template_data.protein_grams)
        .bind(template_data.calories)
        .bind(template_data.notes)
        .bind(Utc::now())
        .bind(template_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_template_by_id(template_id).await
    }

    pub async fn delete_template(&self, template_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM meal_templates WHERE id = ?")
            .bind(template_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Create a meal entry from a template and bump its usage counter.
    pub async fn log_template(
        &self,
        template_id: i64,
        date: Option<NaiveDate>,
    ) -> AppResult<Option<MealEntry>> {
        let Some(template) = self.get_template_by_id(template_id).await? else {
            return Ok(None);
        };

        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        let now = Utc::now();

        let result = sqlx::query(
            r"
            INSERT INTO meal_entries (date, name, protein_grams, calories, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(date)
        .bind(&template.name)
        .bind(template.protein_grams)
        .bind(template.calories)
        .bind(&template.notes)
        .bind(now)
        .bind(now)
        .execute(&self.db)
        .await?;

        sqlx::query(
            "UPDATE meal_templates SET times_used = times_used + 1, updated_at = ? WHERE id = ?",
        )
        .bind(now)
        .bind(template_id)
        .execute(&self.db)
        .await?;

        Ok(Some(MealEntry {
            id: result.last_insert_rowid(),
            date,
            name: template.name,
            protein_grams: template.protein_grams,
            calories: template.calories,
            notes: template.notes,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn name_exists(&self, name: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM meal_templates WHERE name = ?")
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
