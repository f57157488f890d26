//! Pinecone-compatible vector index client (read-only).

use crate::adapters::http::HttpInvoker;
use crate::config::credentials::Credential;
use crate::config::toml_config::PineconeConfig;
use crate::domain::model::ClassMatch;
use crate::domain::ports::VectorIndex;
use crate::utils::error::{AssistError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::OnceCell;

const QUERY_SERVICE: &str = "vector query";
const DESCRIBE_SERVICE: &str = "vector index lookup";
const API_VERSION: &str = "2024-07";

#[derive(Debug)]
pub struct PineconeIndex {
    http: HttpInvoker,
    index_name: String,
    control_plane_url: String,
    api_key: Credential,
    host: OnceCell<String>,
}

impl PineconeIndex {
    pub fn new(http: HttpInvoker, config: &PineconeConfig, api_key: Credential) -> Self {
        let host = match &config.host {
            Some(host) => OnceCell::new_with(Some(normalize_host(host))),
            None => OnceCell::new(),
        };

        Self {
            http,
            index_name: config.index_name.clone(),
            control_plane_url: config.control_plane_url.trim_end_matches('/').to_string(),
            api_key,
            host,
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Data-plane URL, looked up from the control plane on first use.
    async fn host(&self, api_key: &str) -> Result<&str> {
        let host = self
            .host
            .get_or_try_init(|| async {
                let url = format!("{}/indexes/{}", self.control_plane_url, self.index_name);
                tracing::debug!("Resolving host for index {} via {}", self.index_name, url);

                let description: IndexDescription = self
                    .http
                    .execute(DESCRIBE_SERVICE, |client| {
                        client
                            .get(&url)
                            .header("Api-Key", api_key)
                            .header("X-Pinecone-API-Version", API_VERSION)
                    })
                    .await?;

                tracing::info!("Index {} served from {}", self.index_name, description.host);
                Ok::<_, AssistError>(normalize_host(&description.host))
            })
            .await?;

        Ok(host.as_str())
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    host: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<HashMap<String, serde_json::Value>>,
}

impl From<QueryMatch> for ClassMatch {
    fn from(m: QueryMatch) -> Self {
        let description = m
            .metadata
            .as_ref()
            .and_then(|meta| meta.get("description"))
            .and_then(|d| d.as_str())
            .unwrap_or_default()
            .to_string();

        if description.is_empty() {
            tracing::warn!("Match {} has no description metadata", m.id);
        }

        ClassMatch {
            id: m.id,
            score: m.score,
            description,
        }
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    fn check_credentials(&self) -> Result<()> {
        self.api_key.require().map(|_| ())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<ClassMatch>> {
        let api_key = self.api_key.require()?;
        let url = format!("{}/query", self.host(api_key).await?);
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata,
        };

        tracing::debug!("Querying index {} for top {} matches", self.index_name, top_k);
        let response: QueryResponse = self
            .http
            .execute(QUERY_SERVICE, |client| {
                client
                    .post(&url)
                    .header("Api-Key", api_key)
                    .header("X-Pinecone-API-Version", API_VERSION)
                    .json(&body)
            })
            .await?;

        tracing::debug!("Index returned {} matches", response.matches.len());
        Ok(response.matches.into_iter().map(ClassMatch::from).collect())
    }
}
