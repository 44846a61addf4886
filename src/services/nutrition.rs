//! wger ingredient lookup client.
//!
//! The wger API (<https://wger.de/api/v2>) is free and needs no key for
//! ingredient search. Results are per 100 g. Responses are cached in memory
//! with a TTL since ingredient data changes rarely.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::env;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct NutritionConfig {
    pub base_url: String,
    pub cache_ttl: Duration,
    pub timeout: Duration,
    pub result_limit: u32,
}

impl Default for NutritionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://wger.de/api/v2".to_string(),
            cache_ttl: Duration::from_secs(3600),
            timeout: Duration::from_secs(10),
            result_limit: 10,
        }
    }
}

impl NutritionConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base_url = env::var("WGER_BASE_URL").unwrap_or(defaults.base_url);
        let cache_ttl = env::var("NUTRITION_CACHE_TTL_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.cache_ttl);
        let result_limit = env::var("NUTRITION_RESULT_LIMIT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.result_limit);

        Self {
            base_url,
            cache_ttl,
            timeout: defaults.timeout,
            result_limit,
        }
    }
}

/// Nutrition facts for one ingredient, per 100 g.
#[derive(Debug, Clone, Serialize)]
pub struct IngredientInfo {
    pub name: String,
    pub protein_grams: f64,
    pub calories_kcal: f64,
    pub carbohydrates_grams: f64,
    pub fat_grams: f64,
}

#[derive(Debug, Deserialize)]
struct WgerSearchResponse {
    results: Vec<WgerIngredient>,
}

// wger serializes decimal fields as strings, so accept either form
#[derive(Debug, Deserialize)]
struct WgerIngredient {
    name: String,
    #[serde(deserialize_with = "f64_from_number_or_string")]
    protein: f64,
    #[serde(deserialize_with = "f64_from_number_or_string")]
    energy: f64,
    #[serde(deserialize_with = "f64_from_number_or_string")]
    carbohydrates: f64,
    #[serde(deserialize_with = "f64_from_number_or_string")]
    fat: f64,
}

fn f64_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Vec<IngredientInfo>,
    expires_at: Instant,
}

pub struct NutritionClient {
    config: NutritionConfig,
    http_client: reqwest::Client,
    cache: RwLock<HashMap<String, CacheEntry>>,
}

impl NutritionClient {
    pub fn new(config: NutritionConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::external_service("wger", e.to_string()))?;

        Ok(Self {
            config,
            http_client,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Search ingredients by name, returning nutrition facts per 100 g.
    pub async fn search(&self, query: &str) -> AppResult<Vec<IngredientInfo>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::invalid_input("Search query cannot be empty"));
        }

        let cache_key = query.to_lowercase();
        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&cache_key) {
                if Instant::now() < entry.expires_at {
                    return Ok(entry.data.clone());
                }
            }
        }

        let url = format!("{}/ingredient/", self.config.base_url);
        let limit = self.config.result_limit.to_string();
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("name", query),
                // English entries only; wger otherwise mixes languages
                ("language", "2"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::external_service("wger", e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::external_service(
                "wger",
                format!("HTTP {}", response.status()),
            ));
        }

        let search_response: WgerSearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::external_service("wger", format!("invalid response: {e}")))?;

        let results: Vec<IngredientInfo> = search_response
            .results
            .into_iter()
            .map(|ingredient| IngredientInfo {
                name: ingredient.name,
                protein_grams: ingredient.protein,
                calories_kcal: ingredient.energy,
                carbohydrates_grams: ingredient.carbohydrates,
                fat_grams: ingredient.fat,
            })
            .collect();

        let mut cache = self.cache.write().await;
        cache.insert(
            cache_key,
            CacheEntry {
                data: results.clone(),
                expires_at: Instant::now() + self.config.cache_ttl,
            },
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_and_string_decimals() {
        let json = r#"{
            "results": [
                {"name": "Chicken breast", "protein": "23.100", "energy": 110, "carbohydrates": "0.0", "fat": 1.2}
            ]
        }"#;

        let parsed: WgerSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.results[0].protein, 23.1);
        assert_eq!(parsed.results[0].energy, 110.0);
        assert_eq!(parsed.results[0].fat, 1.2);
    }

    #[test]
    fn rejects_unparseable_decimal() {
        let json = r#"{"results": [{"name": "x", "protein": "a lot", "energy": 1, "carbohydrates": 0, "fat": 0}]}"#;
        assert!(serde_json::from_str::<WgerSearchResponse>(json).is_err());
    }
}
