use crate::config::toml_config::AppConfig;
use crate::utils::error::{AssistError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Loads a `.env` file from the working directory or one of its parents.
///
/// Variables already present in the environment are left untouched.
/// Returns the file that was loaded, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Same as [`load_dotenv`] for an explicit file.
pub fn load_dotenv_from(path: &Path) -> Option<PathBuf> {
    dotenvy::from_path(path).ok().map(|_| path.to_path_buf())
}

/// A named secret that may be absent from the environment.
#[derive(Clone)]
pub struct Credential {
    variable: String,
    value: Option<String>,
}

impl Credential {
    pub fn new(variable: impl Into<String>, value: Option<String>) -> Self {
        Self {
            variable: variable.into(),
            value: value.filter(|v| !v.trim().is_empty()),
        }
    }

    pub fn from_env(variable: &str) -> Self {
        Self::new(variable, std::env::var(variable).ok())
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    pub fn require(&self) -> Result<&str> {
        self.value
            .as_deref()
            .ok_or_else(|| AssistError::missing_credential(&self.variable))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("variable", &self.variable)
            .field("present", &self.is_present())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub openai: Credential,
    pub pinecone: Credential,
}

impl Credentials {
    pub fn from_env(config: &AppConfig) -> Self {
        let credentials = Self {
            openai: Credential::from_env(&config.openai.api_key_env),
            pinecone: Credential::from_env(&config.pinecone.api_key_env),
        };

        for credential in [&credentials.openai, &credentials.pinecone] {
            if !credential.is_present() {
                tracing::warn!(
                    "{} is not set; requests that need it will fail",
                    credential.variable()
                );
            }
        }

        credentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_dotenv_file_supplies_missing_key() {
        let mut env_file = NamedTempFile::new().unwrap();
        writeln!(env_file, "OBJECTIVE_ASSIST_DOTENV_KEY=sk-from-file").unwrap();
        writeln!(env_file, "OBJECTIVE_ASSIST_DOTENV_SET=from-file").unwrap();
        std::env::set_var("OBJECTIVE_ASSIST_DOTENV_SET", "from-shell");

        let loaded = load_dotenv_from(env_file.path());

        assert_eq!(loaded.as_deref(), Some(env_file.path()));
        let credential = Credential::from_env("OBJECTIVE_ASSIST_DOTENV_KEY");
        assert_eq!(credential.require().unwrap(), "sk-from-file");
        assert_eq!(std::env::var("OBJECTIVE_ASSIST_DOTENV_SET").unwrap(), "from-shell");

        std::env::remove_var("OBJECTIVE_ASSIST_DOTENV_KEY");
        std::env::remove_var("OBJECTIVE_ASSIST_DOTENV_SET");
    }

    #[test]
    fn test_missing_dotenv_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_dotenv_from(&dir.path().join(".env")).is_none());
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let credential = Credential::new("OPENAI_API_KEY", Some("   ".to_string()));
        assert!(!credential.is_present());

        let err = credential.require().unwrap_err();
        assert!(matches!(err, AssistError::MissingCredential { ref variable } if variable == "OPENAI_API_KEY"));
    }

    #[test]
    fn test_debug_never_prints_secret() {
        let credential = Credential::new("PINECONE_API_KEY", Some("pc-secret".to_string()));
        let rendered = format!("{:?}", credential);
        assert!(!rendered.contains("pc-secret"));
        assert!(rendered.contains("present: true"));
    }

    #[test]
    fn test_from_env_uses_configured_variable_names() {
        let mut config = AppConfig::default();
        config.openai.api_key_env = "OBJECTIVE_ASSIST_TEST_OPENAI_KEY".to_string();
        config.pinecone.api_key_env = "OBJECTIVE_ASSIST_TEST_PINECONE_KEY_UNSET".to_string();
        std::env::set_var("OBJECTIVE_ASSIST_TEST_OPENAI_KEY", "sk-test");

        let credentials = Credentials::from_env(&config);

        assert_eq!(credentials.openai.require().unwrap(), "sk-test");
        assert!(credentials.pinecone.require().is_err());

        std::env::remove_var("OBJECTIVE_ASSIST_TEST_OPENAI_KEY");
    }
}
