use crate::utils::error::{AssistError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AssistError::config(field_name, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AssistError::config(
                field_name,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(AssistError::config(
            field_name,
            format!("Invalid URL format '{}': {}", url_str, e),
        )),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(AssistError::config(
            field_name,
            format!("Value {} must be at least {}", value, min_value),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AssistError::config(
            field_name,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(AssistError::config(
            field_name,
            format!("Value {} must be between {} and {}", value, min, max),
        ));
    }
    Ok(())
}

/// Rejects names that could not be used as a file download name.
pub fn validate_file_name(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;

    if value.contains(['/', '\\', '\0', '"']) {
        return Err(AssistError::config(
            field_name,
            format!("'{}' must be a plain file name", value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("openai.base_url", "https://api.openai.com/v1").is_ok());
        assert!(validate_url("openai.base_url", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("openai.base_url", "").is_err());
        assert!(validate_url("openai.base_url", "invalid-url").is_err());
        assert!(validate_url("openai.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("http.timeout_seconds", 5, 1).is_ok());
        assert!(validate_positive_number("http.timeout_seconds", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("objectives.temperature", 0.7, 0.0, 2.0).is_ok());
        assert!(validate_range("objectives.temperature", 2.5, 0.0, 2.0).is_err());
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("objectives.download_filename", "out.txt").is_ok());
        assert!(validate_file_name("objectives.download_filename", "../out.txt").is_err());
        assert!(validate_file_name("objectives.download_filename", "  ").is_err());
    }
}
