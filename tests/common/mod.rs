#![allow(dead_code)]

use httpmock::MockServer;
use objective_assist::config::{Credential, Credentials};
use objective_assist::AppConfig;

pub const OPENAI_KEY: &str = "sk-test";
pub const PINECONE_KEY: &str = "pc-test";

/// Config pointing every provider at `server`, with retries disabled.
pub fn mock_config(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.openai.base_url = server.url("/v1");
    config.pinecone.host = Some(server.base_url());
    config.pinecone.control_plane_url = server.base_url();
    config.http.retry_attempts = 0;
    config.http.timeout_seconds = 5;
    config
}

pub fn credentials() -> Credentials {
    Credentials {
        openai: Credential::new("OPENAI_API_KEY", Some(OPENAI_KEY.to_string())),
        pinecone: Credential::new("PINECONE_API_KEY", Some(PINECONE_KEY.to_string())),
    }
}

pub fn credentials_without_pinecone() -> Credentials {
    Credentials {
        openai: Credential::new("OPENAI_API_KEY", Some(OPENAI_KEY.to_string())),
        pinecone: Credential::new("PINECONE_API_KEY", None),
    }
}

pub fn chat_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
}

pub fn embedding_body() -> serde_json::Value {
    serde_json::json!({
        "object": "list",
        "data": [{"object": "embedding", "index": 0, "embedding": [0.12, -0.5, 0.33]}],
        "model": "text-embedding-ada-002"
    })
}
