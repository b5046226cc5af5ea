//! Document mail: a PDF mailed to a recipient (`quickpay/mailpdf`)
//!
//! A document is either already hosted (`attachment_url`) or a local file
//! the client uploads first (`file`). The URL wins when both are set.

use crate::{merge_entries, non_empty, Address, MailDefaults, PostalFields, ShippingType};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Title sent when the caller did not name the document
pub const DEFAULT_ATTACHMENT_TITLE: &str = "Document";

/// Where the document to mail comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentSource<'a> {
    /// Already uploaded; mail it directly
    Url(&'a str),
    /// Local file that must be uploaded first
    File(&'a Path),
    /// Nothing to mail
    Missing,
}

/// Builder for a document mail request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentMail {
    file_path: Option<PathBuf>,
    attachment_url: Option<String>,
    document_title: Option<String>,
    recipient: Address,
    shipping_type: Option<ShippingType>,
    sender: Option<Address>,
    metadata: Map<String, Value>,
}

impl DocumentMail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alias for [`DocumentMail::new`]
    pub fn create() -> Self {
        Self::new()
    }

    /// Local file to upload before mailing
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// URL of a document that is already uploaded
    pub fn attachment_url(mut self, url: impl Into<String>) -> Self {
        self.attachment_url = Some(url.into());
        self
    }

    pub fn document_title(mut self, title: impl Into<String>) -> Self {
        self.document_title = Some(title.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.recipient.name = Some(name.into());
        self
    }

    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.recipient.company = Some(company.into());
        self
    }

    pub fn address1(mut self, line: impl Into<String>) -> Self {
        self.recipient.address_line_1 = Some(line.into());
        self
    }

    pub fn address2(mut self, line: impl Into<String>) -> Self {
        self.recipient.address_line_2 = Some(line.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.recipient.city = Some(city.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.recipient.state = Some(state.into());
        self
    }

    pub fn zip(mut self, zip: impl Into<String>) -> Self {
        self.recipient.zip = Some(zip.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.recipient.phone = Some(phone.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.recipient.email = Some(email.into());
        self
    }

    /// Delivery tier; falls back to the configured default when unset
    pub fn shipping_type(mut self, shipping_type: ShippingType) -> Self {
        self.shipping_type = Some(shipping_type);
        self
    }

    /// Replace every recipient field with `address`
    pub fn to(mut self, address: Address) -> Self {
        self.set_recipient(address);
        self
    }

    /// Return address printed on the envelope
    pub fn from(mut self, address: Address) -> Self {
        self.set_sender(address);
        self
    }

    /// Merge metadata entries; repeated keys overwrite
    pub fn metadata<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        merge_entries(&mut self.metadata, entries);
        self
    }

    pub(crate) fn set_recipient(&mut self, address: Address) {
        self.recipient = address;
    }

    pub(crate) fn set_sender(&mut self, address: Address) {
        self.sender = Some(address);
    }

    /// Which document this mail refers to
    pub fn attachment(&self) -> AttachmentSource<'_> {
        match (&self.attachment_url, &self.file_path) {
            (Some(url), _) if !url.trim().is_empty() => AttachmentSource::Url(url),
            (_, Some(path)) => AttachmentSource::File(path),
            _ => AttachmentSource::Missing,
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.document_title.as_deref()
    }

    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    pub fn sender(&self) -> Option<&Address> {
        self.sender.as_ref()
    }

    pub fn has_recipient(&self) -> bool {
        !self.recipient.is_empty()
    }

    pub fn has_sender(&self) -> bool {
        self.sender.as_ref().is_some_and(|sender| !sender.is_empty())
    }

    /// Build the `quickpay/mailpdf` payload
    ///
    /// `attachment_url` overrides the builder's own URL; the client passes
    /// the URL returned by the upload step here.
    pub fn payload(
        &self,
        defaults: &MailDefaults,
        attachment_url: Option<&str>,
    ) -> DocumentMailPayload {
        let sender = defaults.resolve_sender(self.sender.as_ref());

        DocumentMailPayload {
            recipient: PostalFields::from_address(&self.recipient),
            shipping_type: self.shipping_type.unwrap_or(defaults.shipping_type),
            attachment_url: attachment_url
                .filter(|url| !url.trim().is_empty())
                .map(str::to_string)
                .or_else(|| non_empty(self.attachment_url.as_ref())),
            attachment_title: non_empty(self.document_title.as_ref())
                .unwrap_or_else(|| DEFAULT_ATTACHMENT_TITLE.to_string()),
            from_address: PostalFields::from_address(&sender).without_email(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Wire payload for `quickpay/mailpdf`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentMailPayload {
    #[serde(flatten)]
    pub recipient: PostalFields,
    #[serde(rename = "shippingTypeId")]
    pub shipping_type: ShippingType,
    #[serde(rename = "attachmentUrl", skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
    #[serde(rename = "attachmentTitle")]
    pub attachment_title: String,
    #[serde(rename = "fromAddress")]
    pub from_address: PostalFields,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}
