//! Configuration validation
//!
//! Catches settings that would only fail once a request is made:
//! - Missing API key
//! - Malformed base URL
//! - Zero timeout or retry count
//! - A default sender with no name or company to print

use super::checkwriter_config::CheckWriterConfig;
use crate::CheckWriterError;

/// Validation error details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// Validate a checkwriter configuration
pub fn validate_config(config: &CheckWriterConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if config.api_key.trim().is_empty() {
        errors.push(ValidationError::new(
            "api_key",
            "API key is required (set api_key or ONLINECHECKWRITER_API_KEY)",
        ));
    }

    if !is_valid_base_url(&config.base_url) {
        errors.push(ValidationError::new(
            "base_url",
            format!("Invalid base URL: {}", config.base_url),
        ));
    }

    if config.timeout == 0 {
        errors.push(ValidationError::new(
            "timeout",
            "Timeout must be greater than 0",
        ));
    }

    if config.retry.times == 0 {
        errors.push(ValidationError::new(
            "retry.times",
            "Retry times counts the first attempt and must be at least 1",
        ));
    }

    if let Some(ref sender) = config.default_sender {
        let named = [&sender.name, &sender.company]
            .iter()
            .any(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()));
        if !sender.is_empty() && !named {
            errors.push(ValidationError::new(
                "default_sender",
                "Default sender must include a name or company",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Absolute http(s) URL with a host
fn is_valid_base_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));

    match rest {
        Some(rest) => rest.split('/').next().is_some_and(|host| !host.is_empty()),
        None => false,
    }
}

/// Validate configuration and return a Result
pub fn validate_config_result(config: &CheckWriterConfig) -> crate::Result<()> {
    validate_config(config).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        CheckWriterError::Config(format!(
            "Configuration validation failed:\n  - {}",
            messages.join("\n  - ")
        ))
    })
}
