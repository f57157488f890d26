//! OpenAI-compatible embeddings and chat completion client.

use crate::adapters::http::HttpInvoker;
use crate::config::credentials::Credential;
use crate::config::toml_config::OpenAiConfig;
use crate::domain::model::ChatRequest;
use crate::domain::ports::{ChatService, EmbeddingService};
use crate::utils::error::{AssistError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const EMBEDDING_SERVICE: &str = "embedding";
const CHAT_SERVICE: &str = "chat completion";

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: HttpInvoker,
    base_url: String,
    embedding_model: String,
    api_key: Credential,
}

impl OpenAiClient {
    pub fn new(http: HttpInvoker, config: &OpenAiConfig, api_key: Credential) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            embedding_model: config.embedding_model.clone(),
            api_key,
        }
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl EmbeddingService for OpenAiClient {
    fn check_credentials(&self) -> Result<()> {
        self.api_key.require().map(|_| ())
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let api_key = self.api_key.require()?;
        let url = self.endpoint("embeddings");
        let body = EmbeddingRequest {
            model: &self.embedding_model,
            input: text,
        };

        tracing::debug!("Requesting embedding from {} with model {}", url, self.embedding_model);
        let response: EmbeddingResponse = self
            .http
            .execute(EMBEDDING_SERVICE, |client| {
                client.post(&url).bearer_auth(api_key).json(&body)
            })
            .await?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| AssistError::MalformedResponse {
                service: EMBEDDING_SERVICE.to_string(),
                message: "response contained no embeddings".to_string(),
            })?;

        tracing::debug!("Received embedding with {} dimensions", embedding.len());
        Ok(embedding)
    }
}

#[async_trait]
impl ChatService for OpenAiClient {
    fn check_credentials(&self) -> Result<()> {
        self.api_key.require().map(|_| ())
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let api_key = self.api_key.require()?;
        let url = self.endpoint("chat/completions");

        tracing::debug!(
            "Requesting chat completion from {} with model {} ({} messages)",
            url,
            request.model,
            request.messages.len()
        );
        let response: ChatResponse = self
            .http
            .execute(CHAT_SERVICE, |client| {
                client.post(&url).bearer_auth(api_key).json(request)
            })
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AssistError::MalformedResponse {
                service: CHAT_SERVICE.to_string(),
                message: "response contained no message content".to_string(),
            })
    }
}
