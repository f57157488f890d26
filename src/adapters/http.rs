//! Shared HTTP plumbing for the provider adapters.
//!
//! Every outbound call goes through [`HttpInvoker`], which owns the timeout
//! and retry policy:
//! - HTTP 429 and 5xx → retry
//! - other 4xx → fail immediately
//! - transport errors (including timeouts) → retry
//! - backoff doubles per attempt starting at `retry_delay_ms`, exponent capped at 5

use crate::config::toml_config::HttpConfig;
use crate::utils::error::{AssistError, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Exactly one round trip per call.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    pub fn from_config(config: &HttpConfig) -> Self {
        Self {
            max_retries: config.retry_attempts,
            base_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(5);
        self.base_delay * (1u32 << exponent)
    }
}

#[derive(Debug, Clone)]
pub struct HttpInvoker {
    client: Client,
    retry: RetryPolicy,
}

impl HttpInvoker {
    pub fn new(timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssistError::config("http", format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, retry })
    }

    pub fn from_config(config: &HttpConfig) -> Result<Self> {
        Self::new(config.timeout(), RetryPolicy::from_config(config))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Sends the request built by `build`, retrying transient failures.
    ///
    /// `build` is called once per attempt since a sent request cannot be reused.
    pub async fn execute<T, F>(&self, service: &str, build: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                let delay = self.retry.delay_for(attempt);
                tracing::debug!("Retrying {} request in {:?} (attempt {})", service, delay, attempt + 1);
                tokio::time::sleep(delay).await;
            }

            match self.send_once(service, build(&self.client)).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.retry.max_retries => {
                    tracing::warn!("{} request failed, will retry: {}", service, e);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once<T: DeserializeOwned>(&self, service: &str, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|e| AssistError::Transport {
            service: service.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        tracing::debug!("{} response status: {}", service, status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistError::UpstreamFailure {
                service: service.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| AssistError::Transport {
            service: service.to_string(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&body).map_err(|e| AssistError::MalformedResponse {
            service: service.to_string(),
            message: e.to_string(),
        })
    }
}
