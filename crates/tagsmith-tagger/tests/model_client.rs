//! Integration tests for `ModelClient` against a local wiremock server.
//!
//! Model output is always a fixture here; these tests pin the request
//! shape (headers, system prompt, product payload) and the error mapping,
//! never the model's actual behavior.

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use tagsmith_catalog::Product;
use tagsmith_tagger::{ModelClient, TaggerError};

const API_KEY: &str = "sk-ant-test";

fn test_client(server: &MockServer) -> ModelClient {
    ModelClient::with_base_url(&server.uri(), API_KEY, "claude-sonnet-4-5-20250929", 1024, 5)
        .expect("failed to build test ModelClient")
}

fn test_product() -> Product {
    serde_json::from_value(json!({
        "id": 42,
        "title": "Linen Shirt",
        "body_html": "<p>Breathable <em>linen</em> for warm days.</p>",
        "vendor": "Acme",
        "product_type": "Shirts",
        "tags": "Linen",
        "variants": [{ "option1": "M", "price": "40.00" }]
    }))
    .unwrap()
}

/// Wraps model text in the messages-API response envelope.
fn model_reply(text: &str) -> serde_json::Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "content": [{ "type": "text", "text": text }],
        "model": "claude-sonnet-4-5-20250929",
        "stop_reason": "end_turn"
    })
}

#[tokio::test]
async fn generate_tags_parses_object_shaped_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", API_KEY))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&model_reply(r#"{"tags": ["Linen ", "SUMMER", "breathable"]}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tags = test_client(&server)
        .generate_tags(&test_product())
        .await
        .unwrap();
    // Normalization (lowercase + trim) applies regardless of what the model produced.
    assert_eq!(tags, vec!["linen", "summer", "breathable"]);
}

#[tokio::test]
async fn generate_tags_accepts_bare_array_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&model_reply(r#"["red", "cotton"]"#)))
        .mount(&server)
        .await;

    let tags = test_client(&server)
        .generate_tags(&test_product())
        .await
        .unwrap();
    assert_eq!(tags, vec!["red", "cotton"]);
}

#[tokio::test]
async fn generate_tags_sends_system_prompt_and_product_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(|request: &Request| {
            let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
            let system = body["system"].as_str().unwrap_or_default();
            let user = body["messages"][0]["content"].as_str().unwrap_or_default();
            system.contains("product tagging assistant")
                && body["max_tokens"] == 1024
                && user.contains("Linen Shirt")
                // Description must arrive stripped of markup.
                && user.contains("Breathable linen for warm days.")
                && !user.contains("<em>")
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(&model_reply(r#"["linen"]"#)))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server)
        .generate_tags(&test_product())
        .await
        .unwrap();
}

#[tokio::test]
async fn generate_tags_maps_non_success_to_generation_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(529).set_body_string("{\"error\":{\"type\":\"overloaded_error\"}}"),
        )
        .mount(&server)
        .await;

    let result = test_client(&server).generate_tags(&test_product()).await;
    match result {
        Err(TaggerError::Generation { status, body }) => {
            assert_eq!(status, 529);
            assert!(body.contains("overloaded_error"));
        }
        other => panic!("expected Generation, got: {other:?}"),
    }
}

#[tokio::test]
async fn generate_tags_maps_prose_reply_to_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(&model_reply("Here are some great tags: linen, summer!")),
        )
        .mount(&server)
        .await;

    let result = test_client(&server).generate_tags(&test_product()).await;
    assert!(
        matches!(result, Err(TaggerError::Parse { .. })),
        "expected Parse, got: {:?}",
        result.err()
    );
}

#[tokio::test]
async fn generate_tags_maps_empty_content_to_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({ "content": [] })))
        .mount(&server)
        .await;

    let result = test_client(&server).generate_tags(&test_product()).await;
    assert!(matches!(result, Err(TaggerError::Parse { .. })));
}
