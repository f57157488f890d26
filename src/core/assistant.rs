use crate::adapters::{HttpInvoker, OpenAiClient, PineconeIndex};
use crate::config::{AppConfig, Credentials};
use crate::core::classify::ClassificationPipeline;
use crate::core::objectives::ObjectivePipeline;
use crate::utils::error::Result;
use std::sync::Arc;

pub type Classifier = ClassificationPipeline<Arc<OpenAiClient>, PineconeIndex, Arc<OpenAiClient>>;
pub type ObjectiveWriter = ObjectivePipeline<Arc<OpenAiClient>>;

/// Both flows wired to the live provider clients.
///
/// Built once at startup and shared by reference with every handler.
pub struct Assistant {
    classifier: Classifier,
    objectives: ObjectiveWriter,
}

impl Assistant {
    pub fn new(config: &AppConfig, credentials: Credentials) -> Result<Self> {
        let http = HttpInvoker::from_config(&config.http)?;
        let retry = http.retry_policy();
        tracing::debug!(
            "HTTP timeout {}s, {} retries starting at {:?}",
            config.http.timeout_seconds,
            retry.max_retries,
            retry.base_delay
        );

        let openai = Arc::new(OpenAiClient::new(
            http.clone(),
            &config.openai,
            credentials.openai,
        ));
        let index = PineconeIndex::new(http, &config.pinecone, credentials.pinecone);
        tracing::info!(
            "Using embedding model {}, index {}, classification model {}, objectives model {}",
            openai.embedding_model(),
            index.index_name(),
            config.classification.model,
            config.objectives.model
        );

        Ok(Self {
            classifier: ClassificationPipeline::new(
                openai.clone(),
                index,
                openai.clone(),
                config.classification.model.clone(),
            ),
            objectives: ObjectivePipeline::new(openai, config.objectives.clone()),
        })
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn objectives(&self) -> &ObjectiveWriter {
        &self.objectives
    }
}
