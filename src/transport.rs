//! HTTP transport to the OnlineCheckWriter API
//!
//! [`Transport`] is the seam between the [`Client`](crate::Client) and the
//! network. [`HttpTransport`] is the reqwest implementation; tests plug in
//! a recording transport instead.

use crate::config::CheckWriterConfig;
use crate::CheckWriterError;
use crate::retry::{with_retry, RetryConfig, RetryDecision, RetryableError};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, RETRY_AFTER};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Failure talking to the API
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status
    ///
    /// `retry_after` holds the `Retry-After` header when it gave seconds.
    #[error("server responded with status {status}: {body}")]
    Status {
        status: u16,
        body: String,
        retry_after: Option<Duration>,
    },

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    /// A 2xx response whose body is not JSON
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl TransportError {
    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Error body, when it is a JSON object
    pub fn json_body(&self) -> Option<Value> {
        match self {
            TransportError::Status { body, .. } => serde_json::from_str(body)
                .ok()
                .filter(Value::is_object),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else if e.is_decode() {
            TransportError::Decode(e.to_string())
        } else {
            TransportError::Connect(e.to_string())
        }
    }
}

impl RetryableError for TransportError {
    fn retry_decision(&self) -> RetryDecision {
        match self {
            TransportError::Connect(_) | TransportError::Timeout(_) => RetryDecision::Retry,
            TransportError::Status {
                status,
                retry_after,
                ..
            } => match (status, retry_after) {
                (429 | 500..=599, Some(wait)) => RetryDecision::RetryAfter(*wait),
                (429 | 500..=599, None) => RetryDecision::Retry,
                _ => RetryDecision::NoRetry,
            },
            TransportError::Decode(_) => RetryDecision::NoRetry,
        }
    }
}

/// Multipart body for a document upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub document_title: String,
    pub file_name: String,
    pub contents: Vec<u8>,
    pub idempotency_key: String,
}

/// Sends requests to the API and returns the parsed JSON body
///
/// `path` is relative to the configured base URL (`checks`,
/// `quickpay/mailpdf`, ...). Successful responses with an empty body
/// yield an empty JSON object.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, TransportError>;

    async fn upload(&self, path: &str, form: UploadForm) -> Result<Value, TransportError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    retry: RetryConfig,
}

impl HttpTransport {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
        retry: RetryConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: format!("{}/", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            retry,
        })
    }

    /// Build from configuration; a zero timeout is rejected
    pub fn from_config(config: &CheckWriterConfig) -> crate::Result<Self> {
        if config.timeout == 0 {
            return Err(CheckWriterError::Config(
                "timeout must be at least 1 second".to_string(),
            ));
        }

        let transport = Self::new(
            &config.base_url,
            config.api_key.clone(),
            Duration::from_secs(config.timeout),
            RetryConfig::from_policy(config.retry.times, config.retry.sleep),
        )?;
        Ok(transport)
    }

    /// Base URL, always ending in `/`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        debug!(method = %method, path = %path, "Sending API request");

        let mut request = self
            .client
            .request(method, self.url(path))
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        if let Some(body) = body {
            request = request.json(body);
        }

        read_response(request.send().await?).await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        if method == Method::GET || method == Method::DELETE {
            let operation = format!("{} {}", method, path);
            with_retry(&self.retry, &operation, || {
                self.send_json(method.clone(), path, body)
            })
            .await
        } else {
            self.send_json(method, path, body).await
        }
    }

    async fn upload(&self, path: &str, form: UploadForm) -> Result<Value, TransportError> {
        debug!(
            path = %path,
            file_name = %form.file_name,
            bytes = form.contents.len(),
            "Uploading document"
        );

        let file = Part::bytes(form.contents).file_name(form.file_name);
        let multipart = Form::new()
            .text("document_title", form.document_title)
            .part("file", file)
            .text("idempotency_key", form.idempotency_key);

        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .multipart(multipart)
            .send()
            .await?;

        read_response(response).await
    }
}

async fn read_response(response: reqwest::Response) -> Result<Value, TransportError> {
    let status = response.status();
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_retry_after);
    let body = response.text().await?;

    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            body,
            retry_after,
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))
}

/// `Retry-After` in delay-seconds form; HTTP dates are ignored
fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transport(base_url: &str) -> HttpTransport {
        HttpTransport::new(base_url, "key", Duration::from_secs(5), RetryConfig::none()).unwrap()
    }

    #[test]
    fn test_base_url_normalized() {
        assert_eq!(
            transport("https://api.onlinecheckwriter.com/api/v3").base_url(),
            "https://api.onlinecheckwriter.com/api/v3/"
        );
        assert_eq!(
            transport("https://test.onlinecheckwriter.com/api/v3///").base_url(),
            "https://test.onlinecheckwriter.com/api/v3/"
        );
    }

    #[test]
    fn test_from_config_rejects_zero_timeout() {
        let mut config = CheckWriterConfig::new("key");
        config.timeout = 0;

        let err = HttpTransport::from_config(&config).unwrap_err();
        assert!(matches!(err, CheckWriterError::Config(_)));

        config.timeout = 1;
        assert!(HttpTransport::from_config(&config).is_ok());
    }

    #[test]
    fn test_url_join() {
        let t = transport("https://example.com/api/v3/");
        assert_eq!(t.url("checks"), "https://example.com/api/v3/checks");
        assert_eq!(t.url("/quickpay/mailpdf"), "https://example.com/api/v3/quickpay/mailpdf");
    }

    #[test]
    fn test_status_error_body() {
        let err = TransportError::Status {
            status: 422,
            body: r#"{"message":"The amount field is required."}"#.to_string(),
            retry_after: None,
        };
        assert_eq!(err.status(), Some(422));
        assert_eq!(
            err.json_body(),
            Some(json!({ "message": "The amount field is required." }))
        );

        let html = TransportError::Status {
            status: 502,
            body: "<html>Bad Gateway</html>".to_string(),
            retry_after: None,
        };
        assert_eq!(html.json_body(), None);
        assert_eq!(TransportError::Connect("refused".into()).status(), None);
    }

    #[test]
    fn test_retry_classification() {
        let status = |status| TransportError::Status {
            status,
            body: String::new(),
            retry_after: None,
        };
        assert_eq!(status(503).retry_decision(), RetryDecision::Retry);
        assert_eq!(status(429).retry_decision(), RetryDecision::Retry);
        assert_eq!(status(422).retry_decision(), RetryDecision::NoRetry);
        assert_eq!(status(401).retry_decision(), RetryDecision::NoRetry);
        let throttled = TransportError::Status {
            status: 429,
            body: String::new(),
            retry_after: Some(Duration::from_secs(2)),
        };
        assert_eq!(
            throttled.retry_decision(),
            RetryDecision::RetryAfter(Duration::from_secs(2))
        );
        let rejected = TransportError::Status {
            status: 422,
            body: String::new(),
            retry_after: Some(Duration::from_secs(2)),
        };
        assert_eq!(rejected.retry_decision(), RetryDecision::NoRetry);
        assert_eq!(
            TransportError::Timeout("slow".into()).retry_decision(),
            RetryDecision::Retry
        );
        assert_eq!(
            TransportError::Decode("bad".into()).retry_decision(),
            RetryDecision::NoRetry
        );
    }

    #[test]
    fn test_json_body_only_keeps_objects() {
        let body = |body: &str| TransportError::Status {
            status: 500,
            body: body.to_string(),
            retry_after: None,
        };
        assert_eq!(body("null").json_body(), None);
        assert_eq!(body("[1,2]").json_body(), None);
        assert_eq!(body("42").json_body(), None);
        assert_eq!(body(r#"{"a":1}"#).json_body(), Some(json!({ "a": 1 })));
    }

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after("1"), Some(Duration::from_secs(1)));
        assert_eq!(parse_retry_after(" 120 "), Some(Duration::from_secs(120)));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2026 07:28:00 GMT"), None);
    }
}
