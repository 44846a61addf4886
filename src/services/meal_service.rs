use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::{CreateMealEntry, MealEntry, UpdateMealEntry};

const MEAL_COLUMNS: &str =
    "id, date, name, protein_grams, calories, notes, created_at, updated_at";

#[derive(Clone)]
pub struct MealService {
    db: SqlitePool,
}

impl MealService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create_entry(&self, entry_data: CreateMealEntry) -> AppResult<MealEntry> {
        validate_meal_fields(
            Some(&entry_data.name),
            Some(entry_data.protein_grams),
            entry_data.calories,
        )?;

        let date = entry_data.date.unwrap_or_else(|| Utc::now().date_naive());
        let now = Utc::now();

        let result = sqlx::query(
            r"
            INSERT INTO meal_entries (date, name, protein_grams, calories, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(date)
        .bind(&entry_data.name)
        .bind(entry_data.protein_grams)
        .bind(entry_data.calories)
        .bind(&entry_data.notes)
        .bind(now)
        .bind(now)
        .execute(&self.db)
        .await?;

        Ok(MealEntry {
            id: result.last_insert_rowid(),
            date,
            name: entry_data.name,
            protein_grams: entry_data.protein_grams,
            calories: entry_data.calories,
            notes: entry_data.notes,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_entry_by_id(&self, entry_id: i64) -> AppResult<Option<MealEntry>> {
        let entry = sqlx::query_as::<_, MealEntry>(&format!(
            "SELECT {MEAL_COLUMNS} FROM meal_entries WHERE id = ?"
        ))
        .bind(entry_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(entry)
    }

    pub async fn get_entries(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<MealEntry>> {
        let mut sql = format!("SELECT {MEAL_COLUMNS} FROM meal_entries WHERE 1 = 1");
        if from.is_some() {
            sql.push_str(" AND date >= ?");
        }
        if to.is_some() {
            sql.push_str(" AND date <= ?");
        }
        sql.push_str(" ORDER BY date DESC, id DESC LIMIT ? OFFSET ?");

        let mut query = sqlx::query_as::<_, MealEntry>(&sql);
        if let Some(from) = from {
            query = query.bind(from);
        }
        if let Some(to) = to {
            query = query.bind(to);
        }
        let entries = query.bind(limit).bind(offset).fetch_all(&self.db).await?;

        Ok(entries)
    }

    pub async fn update_entry(
        &self,
        entry_id: i64,
        entry_data: UpdateMealEntry,
    ) -> AppResult<Option<MealEntry>> {
        validate_meal_fields(
            entry_data.name.as_deref(),
            entry_data.protein_grams,
            entry_data.calories,
        )?;

        let result = sqlx::query(
            r"
            UPDATE meal_entries
            SET date = COALESCE(?, date),
                name = COALESCE(?, name),
                protein_grams = COALESCE(?, protein_grams),
                calories = COALESCE(?, calories),
                notes = COALESCE(?, notes),
                updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(entry_data.date)
        .bind(entry_data.name)
        .bind(entry_data.protein_grams)
        .bind(entry_data.calories)
        .bind(entry_data.notes)
        .bind(Utc::now())
        .bind(entry_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_entry_by_id(entry_id).await
    }

    pub async fn delete_entry(&self, entry_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM meal_entries WHERE id = ?")
            .bind(entry_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// `name: None` means the field is left unchanged by an update
fn validate_meal_fields(
    name: Option<&str>,
    protein_grams: Option<f64>,
    calories: Option<f64>,
) -> AppResult<()> {
    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err(AppError::invalid_input("Meal name cannot be empty"));
        }
    }
    if let Some(protein) = protein_grams {
        if !protein.is_finite() || protein < 0.0 {
            return Err(AppError::invalid_input("Protein cannot be negative"));
        }
    }
    if let Some(calories) = calories {
        if !calories.is_finite() || calories < 0.0 {
            return Err(AppError::invalid_input("Calories cannot be negative"));
        }
    }
    Ok(())
}
