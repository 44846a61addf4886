use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSettings {
    pub id: i64,
    pub body_weight_lbs: f64,
    pub protein_per_lb: f64,
    pub calorie_goal: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl UserSettings {
    /// Daily protein target derived from body weight, rounded to one decimal.
    pub fn protein_goal(&self) -> f64 {
        (self.body_weight_lbs * self.protein_per_lb * 10.0).round() / 10.0
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateSettings {
    pub body_weight_lbs: Option<f64>,
    pub protein_per_lb: Option<f64>,
    pub calorie_goal: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub body_weight_lbs: f64,
    pub protein_per_lb: f64,
    pub protein_goal_grams: f64,
    pub calorie_goal: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserSettings> for SettingsResponse {
    fn from(settings: UserSettings) -> Self {
        let protein_goal_grams = settings.protein_goal();
        Self {
            body_weight_lbs: settings.body_weight_lbs,
            protein_per_lb: settings.protein_per_lb,
            protein_goal_grams,
            calorie_goal: settings.calorie_goal,
            updated_at: settings.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(weight: f64, factor: f64) -> UserSettings {
        UserSettings {
            id: 1,
            body_weight_lbs: weight,
            protein_per_lb: factor,
            calorie_goal: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn protein_goal_is_weight_times_factor() {
        assert_eq!(settings(180.0, 0.8).protein_goal(), 144.0);
        assert_eq!(settings(200.0, 1.0).protein_goal(), 200.0);
    }

    #[test]
    fn protein_goal_rounds_to_one_decimal() {
        // 173 * 0.82 = 141.86
        assert_eq!(settings(173.0, 0.82).protein_goal(), 141.9);
    }
}
