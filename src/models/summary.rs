use chrono::NaiveDate;
use serde::Serialize;

/// Totals for one calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_protein_grams: f64,
    pub total_calories: f64,
    pub meal_count: i64,
    pub workout_count: i64,
    pub protein_goal_grams: f64,
    pub goal_met: bool,
    pub percent_of_goal: f64,
}

/// Per-day summaries over an inclusive date range, with aggregate stats.
/// Days without entries are included zeroed so charts get a continuous axis.
#[derive(Debug, Serialize)]
pub struct HistorySummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub days: Vec<DailySummary>,
    pub days_goal_met: i64,
    pub average_protein_grams: f64,
}
