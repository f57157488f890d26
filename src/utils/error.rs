use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistError {
    #[error("{message}")]
    InvalidInput { message: String },

    #[error("Missing credential: {variable} is not set in the environment")]
    MissingCredential { variable: String },

    #[error("{service} request failed with status {status}: {body}")]
    UpstreamFailure {
        service: String,
        status: u16,
        body: String,
    },

    #[error("{service} request failed: {message}")]
    Transport { service: String, message: String },

    #[error("{service} returned an unexpected response: {message}")]
    MalformedResponse { service: String, message: String },

    #[error("{message}")]
    EmptyResult { message: String },

    #[error("Configuration error in {field}: {message}")]
    Config { field: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidInput,
    MissingCredential,
    UpstreamFailure,
    EmptyResult,
    Internal,
}

impl AssistError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn missing_credential(variable: impl Into<String>) -> Self {
        Self::MissingCredential {
            variable: variable.into(),
        }
    }

    pub fn empty_result(message: impl Into<String>) -> Self {
        Self::EmptyResult {
            message: message.into(),
        }
    }

    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::InvalidInput,
            Self::MissingCredential { .. } => ErrorCategory::MissingCredential,
            Self::UpstreamFailure { .. }
            | Self::Transport { .. }
            | Self::MalformedResponse { .. } => ErrorCategory::UpstreamFailure,
            Self::EmptyResult { .. } => ErrorCategory::EmptyResult,
            Self::Config { .. } | Self::Io(_) | Self::Serialization(_) => ErrorCategory::Internal,
        }
    }

    /// Text shown to the user in place of a model response.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput { message } | Self::EmptyResult { message } => message.clone(),
            Self::UpstreamFailure {
                service,
                status,
                body,
            } => format!("Error from {} (status {}): {}", service, status, body),
            other => format!("Error: {}", other),
        }
    }

    /// Whether a retry of the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::UpstreamFailure { status, .. } => *status == 429 || *status >= 500,
            Self::Transport { .. } => true,
            _ => false,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::InvalidInput | ErrorCategory::EmptyResult => 2,
            ErrorCategory::MissingCredential => 3,
            ErrorCategory::UpstreamFailure => 4,
            ErrorCategory::Internal => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, AssistError>;
