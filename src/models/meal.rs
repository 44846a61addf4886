use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One logged meal (or a direct protein entry without calories).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub name: String,
    pub protein_grams: f64,
    pub calories: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMealEntry {
    /// Defaults to today when omitted
    pub date: Option<NaiveDate>,
    pub name: String,
    pub protein_grams: f64,
    pub calories: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateMealEntry {
    pub date: Option<NaiveDate>,
    pub name: Option<String>,
    pub protein_grams: Option<f64>,
    pub calories: Option<f64>,
    pub notes: Option<String>,
}

/// Saved meal for quick re-entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealTemplate {
    pub id: i64,
    pub name: String,
    pub protein_grams: f64,
    pub calories: Option<f64>,
    pub notes: Option<String>,
    pub times_used: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMealTemplate {
    pub name: String,
    pub protein_grams: f64,
    pub calories: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateMealTemplate {
    pub name: Option<String>,
    pub protein_grams: Option<f64>,
    pub calories: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LogTemplateRequest {
    /// Defaults to today when omitted
    pub date: Option<NaiveDate>,
}

/// Structured nutrition estimate produced from a free-text meal description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealEstimate {
    pub name: String,
    pub protein_grams: f64,
    pub calories: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ParseMealRequest {
    pub description: String,
    pub date: Option<NaiveDate>,
    /// Log the estimate as a meal entry in the same call
    #[serde(default)]
    pub save: bool,
}

#[derive(Debug, Serialize)]
pub struct ParseMealResponse {
    pub estimate: MealEstimate,
    /// Present when the request asked to save the estimate
    pub entry: Option<MealEntry>,
}
