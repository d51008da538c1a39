//! Integration tests for the OpenAI-compatible provider using wiremock

use serde_json::json;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use drawbook::config::OpenAiConfig;
use drawbook::error::DrawbookError;
use drawbook::providers::{ApiKey, IdeaSource, ImageSource, OpenAiProvider};

fn provider_for(server: &MockServer) -> OpenAiProvider {
    let config = OpenAiConfig {
        api_base: server.uri(),
        ..Default::default()
    };
    OpenAiProvider::new(
        config,
        "black and white, line art, coloring book style".to_string(),
        ApiKey::new("sk-test"),
    )
    .unwrap()
}

#[tokio::test]
async fn test_generate_ideas_parses_json_mode_payload() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    let body = json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": "{\"ideas\": [\"A monkey on vines\", \"A parrot in a tree\"]}"
            }
        }]
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let ideas = provider.generate_ideas("Jungle Animals", 2).await.unwrap();
    assert_eq!(
        ideas,
        vec![
            "A monkey on vines".to_string(),
            "A parrot in a tree".to_string()
        ]
    );
}

#[tokio::test]
async fn test_generate_ideas_errors_on_shortfall() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    let body = json!({
        "choices": [{
            "message": { "role": "assistant", "content": "{\"ideas\": [\"only one\"]}" }
        }]
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let err = provider.generate_ideas("Space", 3).await.unwrap_err();
    assert!(err.to_string().contains("expected 3"));
}

#[tokio::test]
async fn test_generate_ideas_401_maps_to_credential_rejected() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let err = provider.generate_ideas("Space", 1).await.unwrap_err();
    let err = err.downcast::<DrawbookError>().unwrap();
    assert!(matches!(err, DrawbookError::CredentialRejected(_)));
}

#[tokio::test]
async fn test_generate_ideas_500_maps_to_provider_error() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = provider.generate_ideas("Space", 1).await.unwrap_err();
    let err = err.downcast::<DrawbookError>().unwrap();
    assert!(matches!(err, DrawbookError::Provider(_)));
}

#[tokio::test]
async fn test_generate_image_returns_url() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    let body = json!({
        "data": [{ "url": "https://img.example/generated/1.png" }]
    });

    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let url = provider.generate_image("A monkey on vines").await.unwrap();
    assert_eq!(url.as_str(), "https://img.example/generated/1.png");
}

#[tokio::test]
async fn test_generate_image_403_maps_to_credential_rejected() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let err = provider.generate_image("A monkey").await.unwrap_err();
    let err = err.downcast::<DrawbookError>().unwrap();
    assert!(matches!(err, DrawbookError::CredentialRejected(_)));
}

#[tokio::test]
async fn test_generate_image_empty_data_is_provider_error() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let err = provider.generate_image("A monkey").await.unwrap_err();
    assert!(err.to_string().contains("no data"));
}
