//! Free-text meal parsing via an OpenAI-compatible chat completions API.
//!
//! Works against OpenAI itself or any compatible server (Ollama, vLLM,
//! LocalAI) by pointing `LLM_BASE_URL` at it. Parsing is optional: when
//! `LLM_API_KEY` is unset the endpoint reports 503 and the rest of the
//! tracker is unaffected.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::models::MealEstimate;

const SYSTEM_PROMPT: &str = "You are a nutrition estimator. The user describes a meal in free \
text. Respond with a single JSON object and nothing else, with exactly these fields: \
\"name\" (a short label for the meal), \"protein_grams\" (number), \"calories\" (number, or \
null if you cannot estimate). Estimate for the whole described portion.";

// Sanity bounds for a single meal; anything outside is a model hallucination
const MAX_PROTEIN_GRAMS: f64 = 1000.0;
const MAX_CALORIES: f64 = 20000.0;

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("LLM_API_KEY").ok().filter(|key| !key.is_empty()),
            base_url: env::var("LLM_BASE_URL").unwrap_or(defaults.base_url),
            model: env::var("LLM_MODEL").unwrap_or(defaults.model),
            timeout: defaults.timeout,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Seam for meal parsing so handlers and tests do not depend on a live API.
#[async_trait]
pub trait NutritionEstimator: Send + Sync {
    async fn estimate(&self, description: &str) -> AppResult<MealEstimate>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Debug)]
pub struct OpenAiEstimator {
    config: LlmConfig,
    api_key: String,
    http_client: reqwest::Client,
}

impl OpenAiEstimator {
    pub fn new(config: LlmConfig) -> AppResult<Self> {
        let Some(api_key) = config.api_key.clone() else {
            return Err(AppError::LlmUnavailable);
        };
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::external_service("llm", e.to_string()))?;

        Ok(Self {
            config,
            api_key,
            http_client,
        })
    }
}

#[async_trait]
impl NutritionEstimator for OpenAiEstimator {
    async fn estimate(&self, description: &str) -> AppResult<MealEstimate> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::invalid_input("Meal description cannot be empty"));
        }

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: description,
                },
            ],
            temperature: 0.0,
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::external_service("llm", e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::external_service(
                "llm",
                format!("HTTP {}", response.status()),
            ));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::external_service("llm", format!("invalid response: {e}")))?;

        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| AppError::external_service("llm", "empty completion"))?;

        parse_estimate(content, description)
    }
}

/// Parse the model output into a [`MealEstimate`], tolerating code fences
/// and surrounding prose, and rejecting implausible numbers.
fn parse_estimate(content: &str, description: &str) -> AppResult<MealEstimate> {
    let json = extract_json_object(content)
        .ok_or_else(|| AppError::external_service("llm", "no JSON object in completion"))?;

    let mut estimate: MealEstimate = serde_json::from_str(json)
        .map_err(|e| AppError::external_service("llm", format!("unparseable estimate: {e}")))?;

    if !estimate.protein_grams.is_finite()
        || estimate.protein_grams < 0.0
        || estimate.protein_grams > MAX_PROTEIN_GRAMS
    {
        return Err(AppError::external_service("llm", "implausible protein estimate"));
    }
    if let Some(calories) = estimate.calories {
        if !calories.is_finite() || calories < 0.0 || calories > MAX_CALORIES {
            return Err(AppError::external_service("llm", "implausible calorie estimate"));
        }
    }

    if estimate.name.trim().is_empty() {
        estimate.name = truncate_label(description);
    }

    Ok(estimate)
}

/// Slice out the outermost `{...}`, which also strips ```json fences.
fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}

fn truncate_label(description: &str) -> String {
    const MAX_LABEL_CHARS: usize = 60;
    let trimmed = description.trim();
    if trimmed.chars().count() <= MAX_LABEL_CHARS {
        trimmed.to_string()
    } else {
        let truncated: String = trimmed.chars().take(MAX_LABEL_CHARS).collect();
        format!("{truncated}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_plain_json() {
        let estimate = parse_estimate(
            r#"{"name": "Grilled chicken with rice", "protein_grams": 42.5, "calories": 620}"#,
            "grilled chicken and a cup of rice",
        )
        .unwrap();

        assert_eq!(estimate.name, "Grilled chicken with rice");
        assert_eq!(estimate.protein_grams, 42.5);
        assert_eq!(estimate.calories, Some(620.0));
    }

    #[test]
    fn strips_code_fences_and_prose() {
        let content = "Here is the estimate:\n```json\n{\"name\": \"Oatmeal\", \"protein_grams\": 11, \"calories\": null}\n```";
        let estimate = parse_estimate(content, "a bowl of oatmeal").unwrap();

        assert_eq!(estimate.name, "Oatmeal");
        assert_eq!(estimate.protein_grams, 11.0);
        assert_eq!(estimate.calories, None);
    }

    #[test]
    fn falls_back_to_description_for_empty_name() {
        let estimate = parse_estimate(
            r#"{"name": "", "protein_grams": 20, "calories": 300}"#,
            "two eggs and toast",
        )
        .unwrap();

        assert_eq!(estimate.name, "two eggs and toast");
    }

    #[test]
    fn rejects_implausible_numbers() {
        assert!(parse_estimate(r#"{"name": "x", "protein_grams": -5, "calories": 100}"#, "x").is_err());
        assert!(parse_estimate(r#"{"name": "x", "protein_grams": 5000, "calories": 100}"#, "x").is_err());
        assert!(parse_estimate(r#"{"name": "x", "protein_grams": 20, "calories": 900000}"#, "x").is_err());
    }

    #[test]
    fn rejects_non_json_output() {
        assert!(parse_estimate("I cannot estimate that meal.", "mystery stew").is_err());
    }

    #[test]
    fn extract_json_handles_nested_braces() {
        let content = r#"note {"name": "a", "extra": {"b": 1}, "protein_grams": 1} done"#;
        let json = extract_json_object(content).unwrap();
        assert!(json.starts_with('{') && json.ends_with('}'));
        assert!(json.contains("protein_grams"));
    }
}
