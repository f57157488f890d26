use crate::config::toml_config::ObjectivesConfig;
use crate::core::normalize::require_nic_entries;
use crate::core::prompt::{objectives_prompt, OBJECTIVES_SYSTEM_PROMPT};
use crate::domain::model::{ChatMessage, ChatRequest, ObjectiveOutcome};
use crate::domain::ports::ChatService;
use crate::utils::error::Result;

/// Company objective drafting from NIC code lines.
pub struct ObjectivePipeline<C: ChatService> {
    chat: C,
    settings: ObjectivesConfig,
}

impl<C: ChatService> ObjectivePipeline<C> {
    pub fn new(chat: C, settings: ObjectivesConfig) -> Self {
        Self { chat, settings }
    }

    pub fn download_filename(&self) -> &str {
        &self.settings.download_filename
    }

    pub async fn run(&self, raw_entries: &str) -> Result<ObjectiveOutcome> {
        let parsed = require_nic_entries(raw_entries)?;

        if !parsed.skipped.is_empty() {
            tracing::warn!(
                "Skipped {} malformed NIC line(s): {}",
                parsed.skipped.len(),
                parsed
                    .skipped
                    .iter()
                    .map(|s| format!("line {} ({})", s.line_number, s.reason))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        self.chat.check_credentials()?;

        tracing::info!("Generating objectives for {} NIC entries", parsed.entries.len());
        let request = ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage::system(OBJECTIVES_SYSTEM_PROMPT),
                ChatMessage::user(objectives_prompt(&parsed.entries)),
            ],
            temperature: Some(self.settings.temperature),
            max_tokens: Some(self.settings.max_tokens),
        };

        let text = self.chat.complete(&request).await?;
        tracing::info!("Generated {} characters of objectives", text.chars().count());

        Ok(ObjectiveOutcome {
            text,
            entries: parsed.entries,
            skipped: parsed.skipped,
        })
    }

    /// Like [`run`](Self::run) but always yields display text.
    pub async fn respond(&self, raw_entries: &str) -> String {
        match self.run(raw_entries).await {
            Ok(outcome) => outcome.text,
            Err(e) => {
                tracing::warn!("Objective generation failed ({:?}): {}", e.category(), e);
                e.user_message()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalize::{EMPTY_NIC_INPUT_MESSAGE, NO_VALID_NIC_ENTRIES_MESSAGE};
    use crate::domain::model::SkipReason;
    use crate::utils::error::AssistError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedChat {
        reply: std::result::Result<String, (u16, String)>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedChat {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16, body: &str) -> Self {
            Self {
                reply: Err((status, body.to_string())),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatService for ScriptedChat {
        fn check_credentials(&self) -> Result<()> {
            Ok(())
        }

        async fn complete(&self, request: &ChatRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err((status, body)) => Err(AssistError::UpstreamFailure {
                    service: "chat completion".to_string(),
                    status: *status,
                    body: body.clone(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_request_uses_sampling_settings() {
        let pipeline = ObjectivePipeline::new(
            ScriptedChat::ok("To carry on the business of software."),
            ObjectivesConfig::default(),
        );

        let outcome = pipeline
            .run("620 - Computer programming\n700 - Real estate")
            .await
            .unwrap();

        assert_eq!(outcome.text, "To carry on the business of software.");
        assert_eq!(outcome.entries.len(), 2);
        assert!(outcome.skipped.is_empty());

        let requests = pipeline.chat.requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.model, "gpt-4");
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, Some(1500));
        assert!(request.messages[1]
            .content
            .contains("NIC 620: Computer programming\nNIC 700: Real estate"));
    }

    #[tokio::test]
    async fn test_rate_limit_is_shown_with_status_and_body() {
        let pipeline = ObjectivePipeline::new(
            ScriptedChat::failing(429, "rate limited"),
            ObjectivesConfig::default(),
        );

        let output = pipeline.respond("620 - Software").await;

        assert!(output.contains("429"));
        assert!(output.contains("rate limited"));
    }

    #[tokio::test]
    async fn test_skipped_lines_are_reported_in_outcome() {
        let pipeline = ObjectivePipeline::new(ScriptedChat::ok("ok"), ObjectivesConfig::default());

        let outcome = pipeline
            .run("620 - Software\nmissing hyphen\nXYZ - no code")
            .await
            .unwrap();

        assert_eq!(outcome.entries.len(), 1);
        let reasons: Vec<SkipReason> = outcome.skipped.iter().map(|s| s.reason).collect();
        assert_eq!(
            reasons,
            vec![SkipReason::MissingHyphen, SkipReason::NoDigitsInCode]
        );
    }

    #[tokio::test]
    async fn test_unusable_input_never_calls_model() {
        let pipeline = ObjectivePipeline::new(ScriptedChat::ok("unused"), ObjectivesConfig::default());

        assert_eq!(pipeline.respond("   ").await, EMPTY_NIC_INPUT_MESSAGE);
        assert_eq!(
            pipeline.respond("hello\nworld").await,
            NO_VALID_NIC_ENTRIES_MESSAGE
        );
        assert!(pipeline.chat.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn test_download_filename_comes_from_settings() {
        let settings = ObjectivesConfig {
            download_filename: "objects.txt".to_string(),
            ..ObjectivesConfig::default()
        };
        let pipeline = ObjectivePipeline::new(ScriptedChat::ok(""), settings);
        assert_eq!(pipeline.download_filename(), "objects.txt");
    }
}
