//! Letters (`letters` endpoint)

use crate::{format_address, merge_entries, non_empty, Address, FormattedAddress, MailDefaults};
use serde::Serialize;
use serde_json::{Map, Value};

pub const DEFAULT_MAIL_CLASS: &str = "first_class";
pub const DEFAULT_ENVELOPE: &str = "standard";

/// Builder for a letter
///
/// Every content source can be set; the payload carries only the one with
/// the highest priority: document id, document URL, HTML, then template.
#[derive(Debug, Clone, PartialEq)]
pub struct Letter {
    document_id: Option<String>,
    document_url: Option<String>,
    html: Option<String>,
    template: Option<String>,
    template_data: Map<String, Value>,
    color: bool,
    double_sided: bool,
    mail_class: String,
    envelope: String,
    extra_documents: Vec<String>,
    recipient: Address,
    sender: Option<Address>,
    description: Option<String>,
    metadata: Map<String, Value>,
}

impl Default for Letter {
    fn default() -> Self {
        Self {
            document_id: None,
            document_url: None,
            html: None,
            template: None,
            template_data: Map::new(),
            color: false,
            double_sided: false,
            mail_class: DEFAULT_MAIL_CLASS.to_string(),
            envelope: DEFAULT_ENVELOPE.to_string(),
            extra_documents: Vec::new(),
            recipient: Address::default(),
            sender: None,
            description: None,
            metadata: Map::new(),
        }
    }
}

impl Letter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create() -> Self {
        Self::new()
    }

    /// Previously uploaded document to print
    pub fn document(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = Some(document_id.into());
        self
    }

    pub fn document_url(mut self, url: impl Into<String>) -> Self {
        self.document_url = Some(url.into());
        self
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Use a stored template; replaces any previous merge data
    pub fn template<K, V>(
        mut self,
        template_id: impl Into<String>,
        data: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.template = Some(template_id.into());
        self.template_data = Map::new();
        merge_entries(&mut self.template_data, data);
        self
    }

    /// Merge variables into the template data
    pub fn merge_data<K, V>(mut self, data: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        merge_entries(&mut self.template_data, data);
        self
    }

    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    pub fn mail_class(mut self, class: impl Into<String>) -> Self {
        self.mail_class = class.into();
        self
    }

    pub fn envelope(mut self, envelope: impl Into<String>) -> Self {
        self.envelope = envelope.into();
        self
    }

    /// Append an extra document printed after the main content
    pub fn attach_document(mut self, document_id: impl Into<String>) -> Self {
        self.extra_documents.push(document_id.into());
        self
    }

    pub fn to(mut self, address: Address) -> Self {
        self.set_recipient(address);
        self
    }

    pub fn from(mut self, address: Address) -> Self {
        self.set_sender(address);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

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

    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    pub fn has_recipient(&self) -> bool {
        !self.recipient.is_empty()
    }

    pub fn has_sender(&self) -> bool {
        self.sender.as_ref().is_some_and(|sender| !sender.is_empty())
    }

    /// The content source that will be sent
    pub fn content(&self) -> Option<LetterContent> {
        if let Some(document_id) = non_empty(self.document_id.as_ref()) {
            return Some(LetterContent::Document { document_id });
        }
        if let Some(document_url) = non_empty(self.document_url.as_ref()) {
            return Some(LetterContent::DocumentUrl { document_url });
        }
        if let Some(html) = non_empty(self.html.as_ref()) {
            return Some(LetterContent::Html { html });
        }
        non_empty(self.template.as_ref()).map(|template_id| LetterContent::Template {
            template_id,
            merge_variables: self.template_data.clone(),
        })
    }

    pub fn payload(&self, defaults: &MailDefaults) -> LetterPayload {
        LetterPayload {
            recipient: format_address(&self.recipient),
            sender: format_address(&defaults.resolve_sender(self.sender.as_ref())),
            color: self.color,
            double_sided: self.double_sided,
            mail_class: self.mail_class.clone(),
            envelope: self.envelope.clone(),
            content: self.content(),
            extra_documents: self.extra_documents.clone(),
            description: non_empty(self.description.as_ref()),
            metadata: self.metadata.clone(),
        }
    }
}

/// What gets printed on a letter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LetterContent {
    Document { document_id: String },
    DocumentUrl { document_url: String },
    Html { html: String },
    Template {
        template_id: String,
        merge_variables: Map<String, Value>,
    },
}

/// Wire payload for `letters`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LetterPayload {
    pub recipient: FormattedAddress,
    pub sender: FormattedAddress,
    pub color: bool,
    pub double_sided: bool,
    pub mail_class: String,
    pub envelope: String,
    #[serde(flatten)]
    pub content: Option<LetterContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_documents: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}
