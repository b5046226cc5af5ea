//! Postcards (`postcards` endpoint)

use crate::{format_address, merge_entries, non_empty, Address, FormattedAddress, MailDefaults};
use serde::Serialize;
use serde_json::{Map, Value};

pub const DEFAULT_SIZE: &str = "4x6";
pub const DEFAULT_MAIL_CLASS: &str = "first_class";

/// Builder for a postcard
///
/// Front precedence: image URL, image id, HTML. Back precedence: HTML,
/// plain message. A template is sent alongside whichever sides are set.
#[derive(Debug, Clone, PartialEq)]
pub struct Postcard {
    front_image_url: Option<String>,
    front_image_id: Option<String>,
    front_html: Option<String>,
    back_html: Option<String>,
    back_message: Option<String>,
    template: Option<String>,
    template_data: Map<String, Value>,
    size: String,
    mail_class: String,
    recipient: Address,
    sender: Option<Address>,
    description: Option<String>,
    metadata: Map<String, Value>,
}

impl Default for Postcard {
    fn default() -> Self {
        Self {
            front_image_url: None,
            front_image_id: None,
            front_html: None,
            back_html: None,
            back_message: None,
            template: None,
            template_data: Map::new(),
            size: DEFAULT_SIZE.to_string(),
            mail_class: DEFAULT_MAIL_CLASS.to_string(),
            recipient: Address::default(),
            sender: None,
            description: None,
            metadata: Map::new(),
        }
    }
}

impl Postcard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create() -> Self {
        Self::new()
    }

    pub fn front_image_url(mut self, url: impl Into<String>) -> Self {
        self.front_image_url = Some(url.into());
        self
    }

    /// Uploaded image document for the front
    pub fn front_image(mut self, document_id: impl Into<String>) -> Self {
        self.front_image_id = Some(document_id.into());
        self
    }

    pub fn front_html(mut self, html: impl Into<String>) -> Self {
        self.front_html = Some(html.into());
        self
    }

    pub fn back_html(mut self, html: impl Into<String>) -> Self {
        self.back_html = Some(html.into());
        self
    }

    /// Plain-text message for the back
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.back_message = Some(message.into());
        self
    }

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

    pub fn merge_data<K, V>(mut self, data: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        merge_entries(&mut self.template_data, data);
        self
    }

    /// Card size, e.g. `4x6` or `6x9`
    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    pub fn mail_class(mut self, class: impl Into<String>) -> Self {
        self.mail_class = class.into();
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

    pub fn front(&self) -> Option<PostcardFront> {
        if let Some(front_image_url) = non_empty(self.front_image_url.as_ref()) {
            return Some(PostcardFront::ImageUrl { front_image_url });
        }
        if let Some(front_image_id) = non_empty(self.front_image_id.as_ref()) {
            return Some(PostcardFront::ImageId { front_image_id });
        }
        non_empty(self.front_html.as_ref()).map(|front_html| PostcardFront::Html { front_html })
    }

    pub fn back(&self) -> Option<PostcardBack> {
        if let Some(back_html) = non_empty(self.back_html.as_ref()) {
            return Some(PostcardBack::Html { back_html });
        }
        non_empty(self.back_message.as_ref()).map(|message| PostcardBack::Message { message })
    }

    pub fn payload(&self, defaults: &MailDefaults) -> PostcardPayload {
        let template_id = non_empty(self.template.as_ref());
        let merge_variables = template_id.as_ref().map(|_| self.template_data.clone());

        PostcardPayload {
            recipient: format_address(&self.recipient),
            sender: format_address(&defaults.resolve_sender(self.sender.as_ref())),
            size: self.size.clone(),
            mail_class: self.mail_class.clone(),
            front: self.front(),
            back: self.back(),
            template_id,
            merge_variables,
            description: non_empty(self.description.as_ref()),
            metadata: self.metadata.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PostcardFront {
    ImageUrl { front_image_url: String },
    ImageId { front_image_id: String },
    Html { front_html: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PostcardBack {
    Html { back_html: String },
    Message { message: String },
}

/// Wire payload for `postcards`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostcardPayload {
    pub recipient: FormattedAddress,
    pub sender: FormattedAddress,
    pub size: String,
    pub mail_class: String,
    #[serde(flatten)]
    pub front: Option<PostcardFront>,
    #[serde(flatten)]
    pub back: Option<PostcardBack>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_variables: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}
