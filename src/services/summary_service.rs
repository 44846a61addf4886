use chrono::{Duration, NaiveDate};
use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::models::{DailySummary, HistorySummary, UserSettings};
use crate::services::SettingsService;

/// Longest allowed history range, inclusive (one leap year).
const MAX_HISTORY_DAYS: i64 = 366;

#[derive(Clone)]
pub struct SummaryService {
    db: SqlitePool,
    settings: SettingsService,
}

impl SummaryService {
    pub fn new(db: SqlitePool) -> Self {
        let settings = SettingsService::new(db.clone());
        Self { db, settings }
    }

    pub async fn daily_summary(&self, date: NaiveDate) -> AppResult<DailySummary> {
        let settings = self.settings.get_settings().await?;

        let (total_protein, total_calories, meal_count): (f64, f64, i64) = sqlx::query_as(
            r"
            SELECT COALESCE(SUM(protein_grams), 0.0), COALESCE(SUM(calories), 0.0), COUNT(*)
            FROM meal_entries WHERE date = ?
            ",
        )
        .bind(date)
        .fetch_one(&self.db)
        .await?;

        let workout_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM workout_entries WHERE date = ?")
                .bind(date)
                .fetch_one(&self.db)
                .await?;

        Ok(build_day_summary(
            date,
            total_protein,
            total_calories,
            meal_count,
            workout_count,
            &settings,
        ))
    }

    pub async fn history(&self, from: NaiveDate, to: NaiveDate) -> AppResult<HistorySummary> {
        if from > to {
            return Err(AppError::invalid_input("'from' must not be after 'to'"));
        }
        let span_days = (to - from).num_days() + 1;
        if span_days > MAX_HISTORY_DAYS {
            return Err(AppError::invalid_input(format!(
                "History range is limited to {MAX_HISTORY_DAYS} days"
            )));
        }

        let settings = self.settings.get_settings().await?;

        let meal_rows: Vec<(NaiveDate, f64, f64, i64)> = sqlx::query_as(
            r"
            SELECT date, COALESCE(SUM(protein_grams), 0.0), COALESCE(SUM(calories), 0.0), COUNT(*)
            FROM meal_entries
            WHERE date >= ? AND date <= ?
            GROUP BY date
            ",
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await?;

        let workout_rows: Vec<(NaiveDate, i64)> = sqlx::query_as(
            r"
            SELECT date, COUNT(*)
            FROM workout_entries
            WHERE date >= ? AND date <= ?
            GROUP BY date
            ",
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await?;

        let meals_by_day: HashMap<NaiveDate, (f64, f64, i64)> = meal_rows
            .into_iter()
            .map(|(date, protein, calories, count)| (date, (protein, calories, count)))
            .collect();
        let workouts_by_day: HashMap<NaiveDate, i64> = workout_rows.into_iter().collect();

        // Every day in the range gets an entry, zeroed when nothing was logged
        let mut days = Vec::with_capacity(span_days as usize);
        let mut date = from;
        while date <= to {
            let (protein, calories, meal_count) =
                meals_by_day.get(&date).copied().unwrap_or((0.0, 0.0, 0));
            let workout_count = workouts_by_day.get(&date).copied().unwrap_or(0);
            days.push(build_day_summary(
                date,
                protein,
                calories,
                meal_count,
                workout_count,
                &settings,
            ));
            date = date + Duration::days(1);
        }

        let days_goal_met = days.iter().filter(|day| day.goal_met).count() as i64;
        let average_protein_grams = if days.is_empty() {
            0.0
        } else {
            round1(days.iter().map(|day| day.total_protein_grams).sum::<f64>() / days.len() as f64)
        };

        Ok(HistorySummary {
            from,
            to,
            days,
            days_goal_met,
            average_protein_grams,
        })
    }
}

fn build_day_summary(
    date: NaiveDate,
    total_protein: f64,
    total_calories: f64,
    meal_count: i64,
    workout_count: i64,
    settings: &UserSettings,
) -> DailySummary {
    let protein_goal = settings.protein_goal();
    let percent_of_goal = if protein_goal > 0.0 {
        round1(total_protein / protein_goal * 100.0)
    } else {
        0.0
    };

    DailySummary {
        date,
        total_protein_grams: round1(total_protein),
        total_calories: round1(total_calories),
        meal_count,
        workout_count,
        protein_goal_grams: protein_goal,
        goal_met: protein_goal > 0.0 && total_protein >= protein_goal,
        percent_of_goal,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
