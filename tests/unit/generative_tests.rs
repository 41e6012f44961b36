//! Unit tests for generative client construction and payload parsing.

use focusflow::config::GenerativeConfig;
use focusflow::generative::openai::parse_json_object;
use focusflow::generative::{self, DisabledClient, GenerativeTextClient};
use focusflow::AppError;

#[test]
fn parses_json_object() {
    let value = parse_json_object(r#" {"title": "T", "description": "D"} "#).expect("object");
    assert_eq!(value["title"], "T");
}

#[test]
fn rejects_non_json_text() {
    let err = parse_json_object("Sure! Here is your suggestion: ...").unwrap_err();
    assert!(matches!(err, AppError::Generative(_)));
}

#[test]
fn rejects_json_that_is_not_an_object() {
    let err = parse_json_object(r#"["title", "description"]"#).unwrap_err();
    assert!(matches!(err, AppError::Generative(msg) if msg.contains("object")));
}

#[tokio::test]
async fn disabled_client_always_fails() {
    let err = DisabledClient.complete("anything").await.unwrap_err();
    assert!(matches!(err, AppError::Generative(msg) if msg.contains("disabled")));
}

#[tokio::test]
async fn missing_api_key_builds_disabled_client() {
    let config = GenerativeConfig::default();
    let client = generative::from_config(&config).expect("client");
    assert!(client.complete("prompt").await.is_err());
}

#[test]
fn api_key_builds_http_client() {
    let config = GenerativeConfig {
        api_key: Some("sk-test".into()),
        ..GenerativeConfig::default()
    };
    assert!(generative::from_config(&config).is_ok());
}
