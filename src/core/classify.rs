use crate::core::normalize::normalize_objective;
use crate::core::prompt::{classification_prompt, CLASSIFICATION_SYSTEM_PROMPT};
use crate::domain::model::{ChatMessage, ChatRequest};
use crate::domain::ports::{ChatService, EmbeddingService, VectorIndex};
use crate::utils::error::{AssistError, Result};

/// Number of nearest classes offered to the model.
pub const TOP_K: usize = 5;

pub const NO_MATCH_MESSAGE: &str = "No suitable class found.";

/// Trademark classification: embed → nearest classes → chat completion.
pub struct ClassificationPipeline<E: EmbeddingService, V: VectorIndex, C: ChatService> {
    embedder: E,
    index: V,
    chat: C,
    model: String,
}

impl<E: EmbeddingService, V: VectorIndex, C: ChatService> ClassificationPipeline<E, V, C> {
    pub fn new(embedder: E, index: V, chat: C, model: impl Into<String>) -> Self {
        Self {
            embedder,
            index,
            chat,
            model: model.into(),
        }
    }

    pub async fn run(&self, raw_objective: &str) -> Result<String> {
        let objective = normalize_objective(raw_objective)?;

        self.embedder.check_credentials()?;
        self.index.check_credentials()?;
        self.chat.check_credentials()?;

        tracing::info!("Classifying objective ({} chars)", objective.normalized.chars().count());
        let vector = self.embedder.embed(&objective.normalized).await?;

        let matches = self.index.query(&vector, TOP_K, true).await?;
        if matches.is_empty() {
            tracing::info!("Vector index returned no matches");
            return Err(AssistError::empty_result(NO_MATCH_MESSAGE));
        }
        tracing::debug!(
            "Candidate classes: {}",
            matches
                .iter()
                .map(|m| format!("{} ({:.3})", m.id, m.score))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(CLASSIFICATION_SYSTEM_PROMPT),
                ChatMessage::user(classification_prompt(&objective, &matches)),
            ],
            temperature: None,
            max_tokens: None,
        };

        let answer = self.chat.complete(&request).await?;
        tracing::info!("Classification completed");
        Ok(answer)
    }

    /// Like [`run`](Self::run) but always yields display text.
    pub async fn respond(&self, raw_objective: &str) -> String {
        match self.run(raw_objective).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Classification failed ({:?}): {}", e.category(), e);
                e.user_message()
            }
        }
    }
}
