use super::*;
use crate::embedding::EmbeddingParams;
use std::time::Duration;

#[test]
fn test_config_builder() {
    let config = OpenAiConfig::new("test-key")
        .with_model("gpt-4o")
        .with_base_url("http://localhost:8080/v1")
        .with_timeout(Duration::from_secs(30));

    assert_eq!(config.api_key, "test-key");
    assert_eq!(config.default_model, "gpt-4o");
    assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/v1"));
    assert_eq!(config.timeout, Duration::from_secs(30));
}

#[test]
fn test_config_defaults() {
    let config = OpenAiConfig::new("test-key");
    assert_eq!(config.default_model, DEFAULT_MODEL);
    assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    assert!(config.org_id.is_none());
}

#[test]
fn test_config_debug_masks_key() {
    let config = OpenAiConfig::new("sk-1234567890abcdefghijklmnop").with_org_id("org-secret");
    let debug_str = format!("{:?}", config);

    assert!(!debug_str.contains("1234567890abcdefghijkl"));
    assert!(debug_str.contains("sk-1...mnop"));
    assert!(!debug_str.contains("org-secret"));
}

#[test]
fn test_stream_request_asks_for_usage() {
    let request = ChatRequest {
        include_usage: true,
        ..ChatRequest::new("gpt-4o-mini").with_message(Message::user("hi"))
    };
    let openai_request = OpenAiProvider::build_chat_request(request, true);

    let json = serde_json::to_value(openai_request).unwrap();
    assert_eq!(json["stream"].as_bool(), Some(true));
    assert_eq!(json["stream_options"]["include_usage"].as_bool(), Some(true));
}

#[test]
fn test_plain_request_is_not_streamed() {
    let request = ChatRequest::new("gpt-4o-mini")
        .with_message(Message::system("be brief"))
        .with_message(Message::user("hi"))
        .with_max_tokens(16);
    let openai_request = OpenAiProvider::build_chat_request(request, false);

    let json = serde_json::to_value(openai_request).unwrap();
    assert_eq!(json["model"], "gpt-4o-mini");
    assert_eq!(json["messages"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["messages"][0]["role"], "system");
    assert_eq!(json["max_completion_tokens"], 16);
    assert!(json.get("stream_options").map_or(true, |v| v.is_null()));
}

#[test]
fn test_embedding_request_from_params() {
    let request = EmbeddingRequest::Model(EmbeddingParams::new(
        "text-embedding-3-small",
        vec!["a".to_string(), "b".to_string()],
    ));
    let openai_request = OpenAiProvider::build_embedding_request(request).unwrap();
    assert_eq!(openai_request.model, "text-embedding-3-small");
}

#[test]
fn test_embedding_request_from_raw_body() {
    let request = EmbeddingRequest::Raw(serde_json::json!({
        "model": "text-embedding-3-large",
        "input": ["hello"],
    }));
    let openai_request = OpenAiProvider::build_embedding_request(request).unwrap();
    assert_eq!(openai_request.model, "text-embedding-3-large");

    let bad = EmbeddingRequest::Raw(serde_json::json!({ "input": 42 }));
    assert!(matches!(
        OpenAiProvider::build_embedding_request(bad),
        Err(Error::InvalidRequest(_))
    ));
}

#[test]
fn test_provider_reports_default_model() {
    let provider = OpenAiProvider::new(OpenAiConfig::new("test-key").with_model("gpt-5"));
    assert_eq!(provider.name(), "openai");
    assert_eq!(provider.default_model(), "gpt-5");
}
