//! Error types for checkwriter
//!
//! Every client operation fails with [`CheckWriterError`]. API failures are
//! classified by HTTP status: see [`CheckWriterError::is_validation_error`],
//! [`CheckWriterError::is_authentication_error`] and
//! [`CheckWriterError::is_rate_limit_error`].

use crate::config::Edition;
use crate::transport::TransportError;
use checkwriter_message::MessageKind;
use serde_json::Value;
use thiserror::Error;

/// Result type alias for checkwriter operations
pub type Result<T> = std::result::Result<T, CheckWriterError>;

#[derive(Error, Debug)]
pub enum CheckWriterError {
    /// An API call failed
    ///
    /// `message` reads `Failed to {action}: {detail}`, where detail is the
    /// `message` field of the JSON error body when there is one.
    #[error("{message}")]
    Api {
        action: String,
        message: String,
        status: Option<u16>,
        response: Option<Value>,
    },

    /// The message variant has no endpoint in the configured API edition
    #[error("Unknown message type: {kind} is not supported by the {edition} API")]
    UnknownMessageType { kind: MessageKind, edition: Edition },

    #[error("No attachment URL or file path provided for document mail")]
    MissingAttachment,

    /// The upload succeeded but returned no `data.file_url`
    #[error("Failed to get attachment URL from upload response: {response}")]
    UploadUrlMissing { response: Value },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Message error: {0}")]
    Message(#[from] checkwriter_message::Error),

    #[error("{0}")]
    Other(String),
}

impl CheckWriterError {
    /// Translate a transport failure for `action` (e.g. "send check")
    pub fn from_transport(action: &str, error: TransportError) -> Self {
        let response = error.json_body();
        let detail = response
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());

        CheckWriterError::Api {
            action: action.to_string(),
            message: format!("Failed to {}: {}", action, detail),
            status: error.status(),
            response,
        }
    }

    /// HTTP status of a failed API call
    pub fn status(&self) -> Option<u16> {
        match self {
            CheckWriterError::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Parsed error body (API failures) or raw upload response
    pub fn response(&self) -> Option<&Value> {
        match self {
            CheckWriterError::Api { response, .. } => response.as_ref(),
            CheckWriterError::UploadUrlMissing { response } => Some(response),
            _ => None,
        }
    }

    pub fn is_validation_error(&self) -> bool {
        self.status() == Some(422)
    }

    pub fn is_authentication_error(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_rate_limit_error(&self) -> bool {
        self.status() == Some(429)
    }
}
