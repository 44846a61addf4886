use chrono::{Duration, NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::{CreateWorkoutEntry, UpdateWorkoutEntry, WorkoutComparison, WorkoutEntry};

const WORKOUT_COLUMNS: &str = "id, date, category_id, exercise, sets, reps, weight_lbs, \
                               duration_minutes, notes, created_at, updated_at";

#[derive(Debug, Default)]
pub struct WorkoutFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category_id: Option<i64>,
    pub exercise: Option<String>,
}

#[derive(Clone)]
pub struct WorkoutService {
    db: SqlitePool,
}

impl WorkoutService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create_entry(&self, entry_data: CreateWorkoutEntry) -> AppResult<WorkoutEntry> {
        validate_workout_fields(
            Some(&entry_data.exercise),
            entry_data.sets,
            entry_data.reps,
            entry_data.weight_lbs,
            entry_data.duration_minutes,
        )?;

        if let Some(category_id) = entry_data.category_id {
            if !self.category_exists(category_id).await? {
                return Err(AppError::invalid_input(format!(
                    "Workout category {category_id} does not exist"
                )));
            }
        }

        let date = entry_data.date.unwrap_or_else(|| Utc::now().date_naive());
        let now = Utc::now();

        let result = sqlx::query(
            r"
            INSERT INTO workout_entries
                (date, category_id, exercise, sets, reps, weight_lbs, duration_minutes, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(date)
        .bind(entry_data.category_id)
        .bind(&entry_data.exercise)
        .bind(entry_data.sets)
        .bind(entry_data.reps)
        .bind(entry_data.weight_lbs)
        .bind(entry_data.duration_minutes)
        .bind(&entry_data.notes)
        .bind(now)
        .bind(now)
        .execute(&self.db)
        .await?;

        Ok(WorkoutEntry {
            id: result.last_insert_rowid(),
            date,
            category_id: entry_data.category_id,
            exercise: entry_data.exercise,
            sets: entry_data.sets,
            reps: entry_data.reps,
            weight_lbs: entry_data.weight_lbs,
            duration_minutes: entry_data.duration_minutes,
            notes: entry_data.notes,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_entry_by_id(&self, entry_id: i64) -> AppResult<Option<WorkoutEntry>> {
        let entry = sqlx::query_as::<_, WorkoutEntry>(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workout_entries WHERE id = ?"
        ))
        .bind(entry_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(entry)
    }

    pub async fn get_entries(
        &self,
        filter: WorkoutFilter,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<WorkoutEntry>> {
        let mut sql = format!("SELECT {WORKOUT_COLUMNS} FROM workout_entries WHERE 1 = 1");
        if filter.from.is_some() {
            sql.push_str(" AND date >= ?");
        }
        if filter.to.is_some() {
            sql.push_str(" AND date <= ?");
        }
        if filter.category_id.is_some() {
            sql.push_str(" AND category_id = ?");
        }
        if filter.exercise.is_some() {
            sql.push_str(" AND exercise = ? COLLATE NOCASE");
        }
        sql.push_str(" ORDER BY date DESC, id DESC LIMIT ? OFFSET ?");

        let mut query = sqlx::query_as::<_, WorkoutEntry>(&sql);
        if let Some(from) = filter.from {
            query = query.bind(from);
        }
        if let Some(to) = filter.to {
            query = query.bind(to);
        }
        if let Some(category_id) = filter.category_id {
            query = query.bind(category_id);
        }
        if let Some(exercise) = filter.exercise {
            query = query.bind(exercise);
        }
        let entries = query.bind(limit).bind(offset).fetch_all(&self.db).await?;

        Ok(entries)
    }

    pub async fn update_entry(
        &self,
        entry_id: i64,
        entry_data: UpdateWorkoutEntry,
    ) -> AppResult<Option<WorkoutEntry>> {
        validate_workout_fields(
            entry_data.exercise.as_deref(),
            entry_data.sets,
            entry_data.reps,
            entry_data.weight_lbs,
            entry_data.duration_minutes,
        )?;
        if let Some(category_id) = entry_data.category_id {
            if !self.category_exists(category_id).await? {
                return Err(AppError::invalid_input(format!(
                    "Workout category {category_id} does not exist"
                )));
            }
        }

        let result = sqlx::query(
            r"
            UPDATE workout_entries
            SET date = COALESCE(?, date),
                category_id = COALESCE(?, category_id),
                exercise = COALESCE(?, exercise),
                sets = COALESCE(?, sets),
                reps = COALESCE(?, reps),
                weight_lbs = COALESCE(?, weight_lbs),
                duration_minutes = COALESCE(?, duration_minutes),
                notes = COALESCE(?, notes),
                updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(entry_data.date)
        .bind(entry_data.category_id)
        .bind(entry_data.exercise)
        .bind(entry_data.sets)
        .bind(entry_data.reps)
        .bind(entry_data.weight_lbs)
        .bind(entry_data.duration_minutes)
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
        let result = sqlx::query("DELETE FROM workout_entries WHERE id = ?")
            .bind(entry_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Compare the best entry for an exercise on `date` against the best
    /// entry seven days earlier. "Best" is highest weight, then most reps,
    /// so the comparison is deterministic when a day has several sets.
    pub async fn compare_week_over_week(
        &self,
        exercise: &str,
        date: NaiveDate,
    ) -> AppResult<WorkoutComparison> {
        if exercise.trim().is_empty() {
            return Err(AppError::invalid_input("Exercise name cannot be empty"));
        }

        let this_week = self.best_entry_on(exercise, date).await?;
        let last_week = self.best_entry_on(exercise, date - Duration::days(7)).await?;

        let (Some(this_week), Some(last_week)) = (this_week, last_week) else {
            return Err(AppError::not_found("Not enough data for comparison"));
        };

        let weight_change_lbs = match (this_week.weight_lbs, last_week.weight_lbs) {
            (Some(current), Some(previous)) => Some(current - previous),
            _ => None,
        };
        let reps_change = match (this_week.reps, last_week.reps) {
            (Some(current), Some(previous)) => Some(current - previous),
            _ => None,
        };

        Ok(WorkoutComparison {
            exercise: this_week.exercise.clone(),
            this_week,
            last_week,
            weight_change_lbs,
            reps_change,
        })
    }

    async fn best_entry_on(
        &self,
        exercise: &str,
        date: NaiveDate,
    ) -> AppResult<Option<WorkoutEntry>> {
        let entry = sqlx::query_as::<_, WorkoutEntry>(&format!(
            r"
            SELECT {WORKOUT_COLUMNS} FROM workout_entries
            WHERE exercise = ? COLLATE NOCASE AND date = ?
            ORDER BY weight_lbs DESC, reps DESC
            LIMIT 1
            "
        ))
        .bind(exercise)
        .bind(date)
        .fetch_optional(&self.db)
        .await?;

        Ok(entry)
    }

    async fn category_exists(&self, category_id: i64) -> AppResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM workout_categories WHERE id = ?")
            .bind(category_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(found.is_some())
    }
}

// `exercise: None` means the field is left unchanged by an update
fn validate_workout_fields(
    exercise: Option<&str>,
    sets: Option<i64>,
    reps: Option<i64>,
    weight_lbs: Option<f64>,
    duration_minutes: Option<i64>,
) -> AppResult<()> {
    if let Some(exercise) = exercise {
        if exercise.trim().is_empty() {
            return Err(AppError::invalid_input("Exercise name cannot be empty"));
        }
    }
    for (value, field) in [(sets, "Sets"), (reps, "Reps"), (duration_minutes, "Duration")] {
        if let Some(value) = value {
            if value < 0 {
                return Err(AppError::invalid_input(format!("{field} cannot be negative")));
            }
        }
    }
    if let Some(weight) = weight_lbs {
        if !weight.is_finite() || weight < 0.0 {
            return Err(AppError::invalid_input("Weight cannot be negative"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_exercise() {
        assert!(validate_workout_fields(Some(""), None, None, None, None).is_err());
        assert!(validate_workout_fields(Some("bench press"), None, None, None, None).is_ok());
    }

    #[test]
    fn rejects_negative_numbers() {
        let row = Some("row");
        assert!(validate_workout_fields(row, Some(-1), None, None, None).is_err());
        assert!(validate_workout_fields(row, None, Some(-8), None, None).is_err());
        assert!(validate_workout_fields(row, None, None, Some(-45.0), None).is_err());
        assert!(validate_workout_fields(row, None, None, None, Some(-30)).is_err());
        assert!(validate_workout_fields(row, Some(3), Some(8), Some(135.0), Some(45)).is_ok());
    }
}
