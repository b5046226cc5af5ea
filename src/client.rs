//! OnlineCheckWriter API client
//!
//! Routes each [`Message`] to its endpoint and sequences the document-mail
//! flow:
//!
//! 1. The mail already has an attachment URL: post it to `quickpay/mailpdf`.
//! 2. The mail has a local file: upload it to `documentmailing/upload`, read
//!    `data.file_url` from the response, then post to `quickpay/mailpdf`.
//! 3. Neither: fail with [`CheckWriterError::MissingAttachment`] without
//!    touching the network.
//!
//! The client never retries and never rolls back. If the upload succeeds and
//! the mail call fails, the uploaded document stays on the service; callers
//! should retry with `attachment_url` set to the uploaded URL instead of
//! uploading again.

use crate::config::{CheckWriterConfig, Edition};
use crate::transport::{HttpTransport, Transport, UploadForm};
use crate::{CheckWriterError, Result};
use checkwriter_message::{
    format_address, Address, AttachmentSource, Check, DocumentMail, Letter, MailCheck,
    MailDefaults, Message, Postcard,
};
use reqwest::Method;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const UPLOAD_PATH: &str = "documentmailing/upload";
pub const MAIL_PDF_PATH: &str = "quickpay/mailpdf";
pub const MAIL_CHECK_PATH: &str = "quickpay/mailcheck";
pub const CHECKS_PATH: &str = "checks";
pub const LETTERS_PATH: &str = "letters";
pub const POSTCARDS_PATH: &str = "postcards";
pub const VERIFY_ADDRESS_PATH: &str = "addresses/verify";

/// API client, generic over its transport
#[derive(Debug, Clone)]
pub struct Client<T: Transport = HttpTransport> {
    transport: T,
    defaults: MailDefaults,
    edition: Edition,
}

impl Client<HttpTransport> {
    /// Build a client talking HTTP to the configured endpoint
    pub fn new(config: &CheckWriterConfig) -> Result<Self> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::with_transport(
            transport,
            config.mail_defaults(),
            config.edition,
        ))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(transport: T, defaults: MailDefaults, edition: Edition) -> Self {
        Self {
            transport,
            defaults,
            edition,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn defaults(&self) -> &MailDefaults {
        &self.defaults
    }

    pub fn edition(&self) -> Edition {
        self.edition
    }

    /// Send any message to the endpoint for its variant
    ///
    /// Variants without an endpoint in the configured edition fail with
    /// [`CheckWriterError::UnknownMessageType`] before any request is made.
    pub async fn send(&self, message: &Message) -> Result<Value> {
        let kind = message.kind();

        let response = match (self.edition, message) {
            (_, Message::DocumentMail(mail)) => self.send_document_mail(mail).await,
            (Edition::Quickpay, Message::MailCheck(check)) => self.send_mail_check(check).await,
            (Edition::Legacy, Message::Check(check)) => self.send_check(check).await,
            (Edition::Legacy, Message::Letter(letter)) => self.send_letter(letter).await,
            (Edition::Legacy, Message::Postcard(postcard)) => self.send_postcard(postcard).await,
            (
                Edition::Quickpay,
                Message::Check(_) | Message::Letter(_) | Message::Postcard(_),
            )
            | (Edition::Legacy, Message::MailCheck(_)) => {
                Err(CheckWriterError::UnknownMessageType {
                    kind,
                    edition: self.edition,
                })
            }
        }?;

        info!(kind = %kind, "Message dispatched");
        Ok(response)
    }

    /// Mail a document, uploading it first when only a file path is set
    pub async fn send_document_mail(&self, mail: &DocumentMail) -> Result<Value> {
        let attachment_url = match mail.attachment() {
            AttachmentSource::Url(url) => url.to_string(),
            AttachmentSource::File(path) => {
                let response = self
                    .upload_document_for_mailing(path, mail.title(), None)
                    .await?;
                match extract_file_url(&response) {
                    Some(url) => url,
                    None => return Err(CheckWriterError::UploadUrlMissing { response }),
                }
            }
            AttachmentSource::Missing => return Err(CheckWriterError::MissingAttachment),
        };

        let payload = serde_json::to_value(mail.payload(&self.defaults, Some(&attachment_url)))?;
        self.mail_pdf(&payload).await
    }

    /// Upload a document so it can be mailed
    ///
    /// `document_title` defaults to the file name without its extension and
    /// `idempotency_key` to a fresh UUID. The file is read before any request
    /// is made, so a missing file fails with [`CheckWriterError::Io`].
    pub async fn upload_document_for_mailing(
        &self,
        path: impl AsRef<Path>,
        document_title: Option<&str>,
        idempotency_key: Option<&str>,
    ) -> Result<Value> {
        let path = path.as_ref();
        let contents = tokio::fs::read(path).await?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());
        let document_title = document_title
            .filter(|title| !title.trim().is_empty())
            .map(str::to_string)
            .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| file_name.clone());
        let idempotency_key = idempotency_key
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        info!(
            file = %path.display(),
            title = %document_title,
            idempotency_key = %idempotency_key,
            "Uploading document for mailing"
        );

        let form = UploadForm {
            document_title,
            file_name,
            contents,
            idempotency_key,
        };

        self.transport
            .upload(UPLOAD_PATH, form)
            .await
            .map_err(|e| failed("upload document for mailing", e))
    }

    /// Upload a document, titled `file_name` when given
    pub async fn upload_document(
        &self,
        path: impl AsRef<Path>,
        file_name: Option<&str>,
    ) -> Result<Value> {
        self.upload_document_for_mailing(path, file_name, None)
            .await
    }

    /// Post a prepared document-mail payload
    pub async fn mail_pdf(&self, payload: &Value) -> Result<Value> {
        self.call("mail PDF", Method::POST, MAIL_PDF_PATH, Some(payload))
            .await
    }

    pub async fn send_mail_check(&self, check: &MailCheck) -> Result<Value> {
        let payload = serde_json::to_value(check.payload(&self.defaults))?;
        self.call("send mail check", Method::POST, MAIL_CHECK_PATH, Some(&payload))
            .await
    }

    pub async fn send_check(&self, check: &Check) -> Result<Value> {
        let payload = serde_json::to_value(check.payload(&self.defaults))?;
        self.call("send check", Method::POST, CHECKS_PATH, Some(&payload))
            .await
    }

    pub async fn send_letter(&self, letter: &Letter) -> Result<Value> {
        let payload = serde_json::to_value(letter.payload(&self.defaults))?;
        self.call("send letter", Method::POST, LETTERS_PATH, Some(&payload))
            .await
    }

    pub async fn send_postcard(&self, postcard: &Postcard) -> Result<Value> {
        let payload = serde_json::to_value(postcard.payload(&self.defaults))?;
        self.call("send postcard", Method::POST, POSTCARDS_PATH, Some(&payload))
            .await
    }

    /// Fetch the status of a mailed item, e.g. `get_status("checks", id)`
    pub async fn get_status(&self, item_type: &str, id: &str) -> Result<Value> {
        let path = item_path(item_type, id);
        self.call("get status", Method::GET, &path, None).await
    }

    /// Cancel a pending mail item
    pub async fn cancel(&self, item_type: &str, id: &str) -> Result<Value> {
        let path = item_path(item_type, id);
        self.call("cancel", Method::DELETE, &path, None).await
    }

    pub async fn verify_address(&self, address: &Address) -> Result<Value> {
        let payload = serde_json::to_value(format_address(address))?;
        self.call("verify address", Method::POST, VERIFY_ADDRESS_PATH, Some(&payload))
            .await
    }

    async fn call(
        &self,
        action: &str,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        debug!(action = %action, path = %path, "Calling OnlineCheckWriter API");

        self.transport
            .request(method, path, body)
            .await
            .map_err(|e| failed(action, e))
    }
}

fn failed(action: &str, error: crate::transport::TransportError) -> CheckWriterError {
    let error = CheckWriterError::from_transport(action, error);
    warn!(action = %action, status = ?error.status(), "{}", error);
    error
}

/// `data.file_url` from an upload response
fn extract_file_url(response: &Value) -> Option<String> {
    response
        .pointer("/data/file_url")
        .and_then(Value::as_str)
        .filter(|url| !url.trim().is_empty())
        .map(str::to_string)
}

/// `{type}/{id}` with each segment percent-encoded
fn item_path(item_type: &str, id: &str) -> String {
    format!(
        "{}/{}",
        urlencoding::encode(item_type.trim_matches('/')),
        urlencoding::encode(id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_file_url() {
        let response = json!({ "data": { "file_url": "https://cdn.example.com/a.pdf" } });
        assert_eq!(
            extract_file_url(&response).as_deref(),
            Some("https://cdn.example.com/a.pdf")
        );

        assert_eq!(extract_file_url(&json!({ "data": {} })), None);
        assert_eq!(extract_file_url(&json!({ "data": { "file_url": "" } })), None);
        assert_eq!(extract_file_url(&json!({ "file_url": "top-level" })), None);
        assert_eq!(extract_file_url(&json!({ "data": { "file_url": 7 } })), None);
    }

    #[test]
    fn test_item_path_encoding() {
        assert_eq!(item_path("checks", "chk_123"), "checks/chk_123");
        assert_eq!(item_path("letters", "a/b c"), "letters/a%2Fb%20c");
        assert_eq!(item_path("/postcards/", "1"), "postcards/1");
    }

    #[test]
    fn test_client_rejects_zero_timeout() {
        let mut config = CheckWriterConfig::new("secret");
        config.timeout = 0;

        let err = Client::new(&config).unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: timeout must be at least 1 second");
    }

    #[test]
    fn test_client_from_config() {
        let config = CheckWriterConfig::new("secret")
            .sandbox()
            .with_edition(Edition::Legacy)
            .with_default_bank_account("acct-1");

        let client = Client::new(&config).unwrap();
        assert_eq!(client.edition(), Edition::Legacy);
        assert_eq!(client.defaults().bank_account_id.as_deref(), Some("acct-1"));
        assert_eq!(
            client.transport().base_url(),
            "https://test.onlinecheckwriter.com/api/v3/"
        );
    }
}
