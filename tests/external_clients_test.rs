use assert_matches::assert_matches;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fittrack::error::AppError;
use fittrack::services::{
    LlmConfig, NutritionClient, NutritionConfig, NutritionEstimator, OpenAiEstimator,
};

fn nutrition_config(base_url: String) -> NutritionConfig {
    NutritionConfig {
        base_url,
        cache_ttl: Duration::from_secs(60),
        timeout: Duration::from_secs(5),
        result_limit: 5,
    }
}

fn llm_config(base_url: String) -> LlmConfig {
    LlmConfig {
        api_key: Some("test-key".to_string()),
        base_url,
        model: "test-model".to_string(),
        timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn wger_search_parses_results_and_caches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ingredient/"))
        .and(query_param("name", "chicken breast"))
        .and(query_param("language", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{
                "id": 1234,
                "name": "Chicken breast",
                "protein": "23.100",
                "energy": 110,
                "carbohydrates": "0.0",
                "fat": "1.2"
            }]
        })))
        // the second lookup must come from the cache
        .expect(1)
        .mount(&server)
        .await;

    let client = NutritionClient::new(nutrition_config(server.uri())).unwrap();

    let results = client.search("chicken breast").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Chicken breast");
    assert_eq!(results[0].protein_grams, 23.1);
    assert_eq!(results[0].calories_kcal, 110.0);

    // same query, different case: served from cache
    let cached = client.search("Chicken Breast").await.unwrap();
    assert_eq!(cached.len(), 1);
}

#[tokio::test]
async fn wger_upstream_failure_is_external_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ingredient/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = NutritionClient::new(nutrition_config(server.uri())).unwrap();
    let error = client.search("anything").await.unwrap_err();

    assert_matches!(error, AppError::ExternalService { .. });
}

#[tokio::test]
async fn wger_empty_query_is_rejected_without_a_request() {
    let server = MockServer::start().await;
    // no mock mounted: an outgoing request would surface as a different error

    let client = NutritionClient::new(nutrition_config(server.uri())).unwrap();
    let error = client.search("   ").await.unwrap_err();

    assert_matches!(error, AppError::InvalidInput(_));
}

#[tokio::test]
async fn llm_estimate_parses_chat_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "{\"name\": \"Chicken burrito\", \"protein_grams\": 38.0, \"calories\": 710}"
                }
            }]
        })))
        .mount(&server)
        .await;

    let estimator = OpenAiEstimator::new(llm_config(server.uri())).unwrap();
    let estimate = estimator
        .estimate("a big chicken burrito with beans")
        .await
        .unwrap();

    assert_eq!(estimate.name, "Chicken burrito");
    assert_eq!(estimate.protein_grams, 38.0);
    assert_eq!(estimate.calories, Some(710.0));
}

#[tokio::test]
async fn llm_fenced_output_still_parses() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "```json\n{\"name\": \"Oatmeal with banana\", \"protein_grams\": 12, \"calories\": null}\n```"
                }
            }]
        })))
        .mount(&server)
        .await;

    let estimator = OpenAiEstimator::new(llm_config(server.uri())).unwrap();
    let estimate = estimator.estimate("oatmeal with a banana").await.unwrap();

    assert_eq!(estimate.name, "Oatmeal with banana");
    assert_eq!(estimate.calories, None);
}

#[tokio::test]
async fn llm_non_json_output_is_external_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {"role": "assistant", "content": "Sorry, I can't estimate that."}
            }]
        })))
        .mount(&server)
        .await;

    let estimator = OpenAiEstimator::new(llm_config(server.uri())).unwrap();
    let error = estimator.estimate("mystery stew").await.unwrap_err();

    assert_matches!(error, AppError::ExternalService { .. });
}

#[tokio::test]
async fn llm_http_error_is_external_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let estimator = OpenAiEstimator::new(llm_config(server.uri())).unwrap();
    let error = estimator.estimate("two eggs").await.unwrap_err();

    assert_matches!(error, AppError::ExternalService { .. });
}

#[tokio::test]
async fn llm_without_key_cannot_be_constructed() {
    let config = LlmConfig {
        api_key: None,
        ..LlmConfig::default()
    };
    assert_matches!(OpenAiEstimator::new(config), Err(AppError::LlmUnavailable));
}
