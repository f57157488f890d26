use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated classification objective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Objective {
    /// Trimmed text as the user typed it; quoted in the prompt.
    pub original: String,
    /// Trimmed, lowercased text; sent to the embedding service.
    pub normalized: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NicEntry {
    pub code: String,
    pub description: String,
}

impl NicEntry {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingHyphen,
    NoDigitsInCode,
    EmptyDescription,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::MissingHyphen => "no hyphen between code and description",
            Self::NoDigitsInCode => "code contains no digits",
            Self::EmptyDescription => "description is empty",
        };
        f.write_str(text)
    }
}

/// A non-blank input line the NIC parser dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the raw input.
    pub line_number: usize,
    pub text: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NicParse {
    pub entries: Vec<NicEntry>,
    pub skipped: Vec<SkippedLine>,
}

/// One nearest-neighbour hit from the class index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMatch {
    pub id: String,
    pub score: f32,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Result of a successful objective generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveOutcome {
    pub text: String,
    pub entries: Vec<NicEntry>,
    pub skipped: Vec<SkippedLine>,
}
