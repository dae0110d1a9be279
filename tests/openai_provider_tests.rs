use axum::http::StatusCode;
use imagegen_server::{
    Error,
    config::OpenAiConfig,
    providers::{ImageProvider, OpenAiProvider},
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::*;

fn provider_for(server: &MockServer) -> OpenAiProvider {
    OpenAiProvider::new(OpenAiConfig {
        api_key: "sk-test".to_string(),
        base_url: format!("{}/v1", server.uri()),
        timeout_secs: 5,
    })
    .unwrap()
}

fn error_body(message: &str, code: &str) -> serde_json::Value {
    json!({
        "error": {
            "message": message,
            "type": "invalid_request_error",
            "param": null,
            "code": code
        }
    })
}

#[tokio::test]
async fn test_generate_returns_first_image_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "prompt": "a portrait",
            "model": "dall-e-3",
            "n": 1,
            "quality": "hd",
            "style": "natural",
            "size": "1024x1792"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1700000000,
            "data": [
                {"url": "https://oaidalle.example/img-1.png", "revised_prompt": "a portrait"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = provider_for(&server).generate("a portrait").await.unwrap();

    assert_eq!(url, "https://oaidalle.example/img-1.png");
}

#[tokio::test]
async fn test_rate_limit_surfaces_upstream_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(error_body("Rate limit reached", "rate_limit_exceeded")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = provider_for(&server).generate("a portrait").await.unwrap_err();

    match err {
        Error::Provider {
            provider,
            status,
            message,
            ..
        } => {
            assert_eq!(provider, "openai");
            assert_eq!(status, 429);
            assert_eq!(message, "Rate limit reached");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_billing_limit_code_is_preserved() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
            "Billing hard limit has been reached",
            "billing_hard_limit_reached",
        )))
        .mount(&server)
        .await;

    let err = provider_for(&server).generate("a portrait").await.unwrap_err();

    match err {
        Error::Provider { status, code, .. } => {
            assert_eq!(status, 400);
            assert_eq!(code.as_deref(), Some("billing_hard_limit_reached"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_image_list_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1700000000,
            "data": []
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server).generate("a portrait").await.unwrap_err();

    assert!(matches!(err, Error::Internal(_)));
}

#[tokio::test]
async fn test_missing_api_key_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(OpenAiConfig {
        api_key: "your_openai_api_key_here".to_string(),
        base_url: format!("{}/v1", server.uri()),
        timeout_secs: 5,
    })
    .unwrap();

    let err = provider.generate("a portrait").await.unwrap_err();

    assert!(matches!(err, Error::ProviderConfigMissing { .. }));
}

async fn app_with_upstream(server: &MockServer) -> (axum::Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let app = create_app(
        create_test_config(temp_dir.path()),
        Arc::new(provider_for(server)),
    );
    (app, temp_dir)
}

#[tokio::test]
async fn test_end_to_end_rate_limit_returns_429() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(error_body("Rate limit reached", "rate_limit_exceeded")),
        )
        .mount(&server)
        .await;

    let (app, temp_dir) = app_with_upstream(&server).await;
    let response = app
        .oneshot(MultipartBuilder::new().jpeg("a.jpg").into_request())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = read_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "ProviderRateLimited");
    assert_eq!(count_files(temp_dir.path()), 0);
}

#[tokio::test]
async fn test_end_to_end_billing_limit_returns_402() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
            "Billing hard limit has been reached",
            "billing_hard_limit_reached",
        )))
        .mount(&server)
        .await;

    let (app, _temp_dir) = app_with_upstream(&server).await;
    let response = app
        .oneshot(MultipartBuilder::new().jpeg("a.jpg").into_request())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    assert_eq!(read_json(response).await["error"], "ProviderBillingLimit");
}

#[tokio::test]
async fn test_end_to_end_plain_bad_request_returns_400() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
            "Your request was rejected by the safety system",
            "content_policy_violation",
        )))
        .mount(&server)
        .await;

    let (app, _temp_dir) = app_with_upstream(&server).await;
    let response = app
        .oneshot(MultipartBuilder::new().jpeg("a.jpg").into_request())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["error"], "ProviderBadRequest");
    assert_eq!(
        body["message"],
        "The image generation service rejected the request."
    );
}

#[tokio::test]
async fn test_end_to_end_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1700000000,
            "data": [{"url": "https://oaidalle.example/cartoon.png"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, temp_dir) = app_with_upstream(&server).await;
    let request = MultipartBuilder::new()
        .jpeg("me.jpg")
        .text("transformationType", "style_cartoon")
        .into_request();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["imageUrl"], "https://oaidalle.example/cartoon.png");
    assert_eq!(body["provider"], "openai");
    assert_eq!(count_files(temp_dir.path()), 0);
}
