mod common;

use common::{chat_body, embedding_body, mock_config, OPENAI_KEY};
use httpmock::prelude::*;
use objective_assist::adapters::{HttpInvoker, OpenAiClient, RetryPolicy};
use objective_assist::config::Credential;
use objective_assist::core::{ChatService, EmbeddingService};
use objective_assist::domain::model::{ChatMessage, ChatRequest};
use objective_assist::AssistError;
use std::time::Duration;

fn client(server: &MockServer, retry: RetryPolicy) -> OpenAiClient {
    let config = mock_config(server);
    let http = HttpInvoker::new(Duration::from_secs(5), retry).unwrap();
    OpenAiClient::new(
        http,
        &config.openai,
        Credential::new("OPENAI_API_KEY", Some(OPENAI_KEY.to_string())),
    )
}

fn chat_request() -> ChatRequest {
    ChatRequest {
        model: "gpt-4".to_string(),
        messages: vec![ChatMessage::system("sys"), ChatMessage::user("hello")],
        temperature: Some(0.7),
        max_tokens: Some(1500),
    }
}

#[tokio::test]
async fn test_embed_sends_model_and_input() {
    let server = MockServer::start_async().await;
    let embeddings_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/embeddings")
                .header("authorization", "Bearer sk-test")
                .json_body_partial(
                    r#"{"model": "text-embedding-ada-002", "input": "selling shoes"}"#,
                );
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(embedding_body());
        })
        .await;

    let vector = client(&server, RetryPolicy::none())
        .embed("selling shoes")
        .await
        .unwrap();

    embeddings_mock.assert_async().await;
    assert_eq!(vector, vec![0.12, -0.5, 0.33]);
}

#[tokio::test]
async fn test_complete_returns_first_choice_content() {
    let server = MockServer::start_async().await;
    let chat_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .json_body_partial(
                    r#"{"model": "gpt-4", "temperature": 0.7, "max_tokens": 1500,
                        "messages": [{"role": "system", "content": "sys"}, {"role": "user", "content": "hello"}]}"#,
                );
            then.status(200).json_body(serde_json::json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "first"}},
                    {"message": {"role": "assistant", "content": "second"}}
                ]
            }));
        })
        .await;

    let text = client(&server, RetryPolicy::none())
        .complete(&chat_request())
        .await
        .unwrap();

    chat_mock.assert_async().await;
    assert_eq!(text, "first");
}

#[tokio::test]
async fn test_rate_limit_surfaces_status_and_body() {
    let server = MockServer::start_async().await;
    let chat_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(429).body("rate limited");
        })
        .await;

    let err = client(&server, RetryPolicy::none())
        .complete(&chat_request())
        .await
        .unwrap_err();

    chat_mock.assert_async().await;
    match err {
        AssistError::UpstreamFailure { status, ref body, .. } => {
            assert_eq!(status, 429);
            assert_eq!(body, "rate limited");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = MockServer::start_async().await;
    let chat_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(503).body("overloaded");
        })
        .await;

    let retry = RetryPolicy {
        max_retries: 2,
        base_delay: Duration::from_millis(10),
    };
    let err = client(&server, retry)
        .complete(&chat_request())
        .await
        .unwrap_err();

    chat_mock.assert_hits_async(3).await;
    assert!(err.user_message().contains("503"));
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let server = MockServer::start_async().await;
    let embeddings_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/embeddings");
            then.status(401).body("invalid api key");
        })
        .await;

    let retry = RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(10),
    };
    let err = client(&server, retry).embed("anything").await.unwrap_err();

    embeddings_mock.assert_hits_async(1).await;
    assert!(err.user_message().contains("invalid api key"));
}

#[tokio::test]
async fn test_missing_choices_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(serde_json::json!({"choices": []}));
        })
        .await;

    let err = client(&server, RetryPolicy::none())
        .complete(&chat_request())
        .await
        .unwrap_err();

    assert!(matches!(err, AssistError::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_missing_key_makes_no_request() {
    let server = MockServer::start_async().await;
    let chat_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(chat_body("unused"));
        })
        .await;

    let config = mock_config(&server);
    let openai = OpenAiClient::new(
        HttpInvoker::from_config(&config.http).unwrap(),
        &config.openai,
        Credential::new("OPENAI_API_KEY", None),
    );

    assert!(ChatService::check_credentials(&openai).is_err());
    let err = openai.complete(&chat_request()).await.unwrap_err();

    chat_mock.assert_hits_async(0).await;
    assert!(matches!(err, AssistError::MissingCredential { .. }));
}

#[tokio::test]
async fn test_timeouts_are_retried_then_surfaced() {
    let server = MockServer::start_async().await;
    let chat_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .delay(Duration::from_secs(2))
                .json_body(chat_body("too late"));
        })
        .await;

    let config = mock_config(&server);
    let retry = RetryPolicy {
        max_retries: 1,
        base_delay: Duration::from_millis(10),
    };
    let http = HttpInvoker::new(Duration::from_millis(200), retry).unwrap();
    let client = OpenAiClient::new(
        http,
        &config.openai,
        Credential::new("OPENAI_API_KEY", Some(OPENAI_KEY.to_string())),
    );

    let err = client.complete(&chat_request()).await.unwrap_err();

    chat_mock.assert_hits_async(2).await;
    assert!(matches!(err, AssistError::Transport { .. }));
    assert!(err
        .user_message()
        .starts_with("Error: chat completion request failed:"));
}
