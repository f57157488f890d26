use crate::utils::error::{AssistError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{
    validate_file_name, validate_non_empty_string, validate_positive_number, validate_range,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "./objective-assist.toml";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const MAX_RETRY_DELAY_MS: u64 = 60_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub openai: OpenAiConfig,
    pub pinecone: PineconeConfig,
    pub classification: ClassificationConfig,
    pub objectives: ObjectivesConfig,
    pub http: HttpConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub embedding_model: String,
    pub api_key_env: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            embedding_model: "text-embedding-ada-002".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PineconeConfig {
    pub index_name: String,
    /// Data-plane URL of the index. Resolved from the control plane when unset.
    pub host: Option<String>,
    pub control_plane_url: String,
    pub api_key_env: String,
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            index_name: "class-objective-all".to_string(),
            host: None,
            control_plane_url: "https://api.pinecone.io".to_string(),
            api_key_env: "PINECONE_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub model: String,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectivesConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub download_filename: String,
}

impl Default for ObjectivesConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            temperature: 0.7,
            max_tokens: 1500,
            download_filename: "company_objectives.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            retry_attempts: 2,
            retry_delay_ms: 500,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8501".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.format).unwrap_or_default()
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` if it exists, otherwise falls back to built-in defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::debug!("Loading configuration from {}", path.display());
            Self::from_file(path)
        } else {
            tracing::debug!(
                "No configuration file at {}, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| AssistError::config("toml_parsing", format!("TOML parsing error: {}", e)))
    }

    /// Replaces `${VAR}` placeholders with environment values; unknown variables are kept as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| AssistError::config("toml_parsing", e.to_string()))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("openai.base_url", &self.openai.base_url)?;
        validate_non_empty_string("openai.embedding_model", &self.openai.embedding_model)?;
        validate_non_empty_string("openai.api_key_env", &self.openai.api_key_env)?;

        validate_non_empty_string("pinecone.index_name", &self.pinecone.index_name)?;
        if let Some(host) = &self.pinecone.host {
            validate_url("pinecone.host", host)?;
        }
        validate_url("pinecone.control_plane_url", &self.pinecone.control_plane_url)?;
        validate_non_empty_string("pinecone.api_key_env", &self.pinecone.api_key_env)?;

        validate_non_empty_string("classification.model", &self.classification.model)?;

        validate_non_empty_string("objectives.model", &self.objectives.model)?;
        validate_range("objectives.temperature", self.objectives.temperature, 0.0, 2.0)?;
        validate_positive_number("objectives.max_tokens", self.objectives.max_tokens.into(), 1)?;
        validate_file_name(
            "objectives.download_filename",
            &self.objectives.download_filename,
        )?;

        validate_positive_number("http.timeout_seconds", self.http.timeout_seconds, 1)?;
        validate_range("http.retry_attempts", self.http.retry_attempts, 0, 10)?;
        validate_range("http.retry_delay_ms", self.http.retry_delay_ms, 0, MAX_RETRY_DELAY_MS)?;

        validate_non_empty_string("server.bind", &self.server.bind)?;

        validate_non_empty_string("logging.level", &self.logging.level)?;
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(AssistError::config(
                "logging.level",
                format!(
                    "Unknown level '{}'. Use one of {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            ));
        }

        if LogFormat::parse(&self.logging.format).is_none() {
            return Err(AssistError::config(
                "logging.format",
                format!("Unsupported format '{}'. Use compact or json", self.logging.format),
            ));
        }

        Ok(())
    }
}
