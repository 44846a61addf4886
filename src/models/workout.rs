use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub category_id: Option<i64>,
    pub exercise: String,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub weight_lbs: Option<f64>,
    pub duration_minutes: Option<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateWorkoutEntry {
    /// Defaults to today when omitted
    pub date: Option<NaiveDate>,
    pub category_id: Option<i64>,
    pub exercise: String,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub weight_lbs: Option<f64>,
    pub duration_minutes: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateWorkoutEntry {
    pub date: Option<NaiveDate>,
    pub category_id: Option<i64>,
    pub exercise: Option<String>,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub weight_lbs: Option<f64>,
    pub duration_minutes: Option<i64>,
    pub notes: Option<String>,
}

/// Week-over-week comparison for one exercise: the best entry on the
/// requested date against the best entry seven days earlier.
#[derive(Debug, Serialize)]
pub struct WorkoutComparison {
    pub exercise: String,
    pub this_week: WorkoutEntry,
    pub last_week: WorkoutEntry,
    pub weight_change_lbs: Option<f64>,
    pub reps_change: Option<i64>,
}
