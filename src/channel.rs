//! Notification channel
//!
//! Turns a notification into a message, fills in the recipient from the
//! entity being notified, and hands the message to the [`Client`].

use crate::client::Client;
use crate::transport::{HttpTransport, Transport};
use crate::Result;
use checkwriter_message::{Address, Message, DEFAULT_COUNTRY};
use serde_json::{Map, Value};
use tracing::debug;

/// An entity that can receive physical mail
///
/// Implement whichever accessors the entity supports. When a message has
/// no recipient, the channel asks them in declaration order and uses the
/// first address returned.
pub trait Notifiable {
    /// Address reserved for OnlineCheckWriter mail
    fn route_notification_for_check_writer(&self) -> Option<Address> {
        None
    }

    /// General-purpose postal address
    fn postal_address(&self) -> Option<Address> {
        None
    }

    /// Raw address attributes, in either naming convention
    ///
    /// Only used when the map carries `address_line_1` or `address1`.
    fn address_attributes(&self) -> Option<Map<String, Value>> {
        None
    }
}

/// A notification deliverable as physical mail
pub trait Notification<N: Notifiable + ?Sized> {
    /// The message to send, or `None` to skip this channel
    fn to_check_writer(&self, notifiable: &N) -> Option<Message>;
}

/// Delivers notifications through a [`Client`]
#[derive(Debug, Clone)]
pub struct Channel<T: Transport = HttpTransport> {
    client: Client<T>,
}

impl<T: Transport> Channel<T> {
    pub fn new(client: Client<T>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client<T> {
        &self.client
    }

    /// Build the message for `notification`, completing its addresses
    ///
    /// Returns `None` when the notification yields no message.
    pub fn prepare<N, M>(&self, notifiable: &N, notification: &M) -> Option<Message>
    where
        N: Notifiable + ?Sized,
        M: Notification<N> + ?Sized,
    {
        let mut message = notification.to_check_writer(notifiable)?;

        if !message.has_recipient() {
            if let Some(recipient) = resolve_recipient(notifiable) {
                debug!(kind = %message.kind(), "Using recipient from notifiable");
                message.set_recipient(recipient);
            }
        }

        if matches!(message, Message::DocumentMail(_)) && !message.has_sender() {
            if let Some(sender) = self.client.defaults().sender.clone() {
                message.set_sender(sender);
            }
        }

        Some(message)
    }

    /// Prepare and send; `Ok(None)` when there was nothing to send
    pub async fn send<N, M>(&self, notifiable: &N, notification: &M) -> Result<Option<Value>>
    where
        N: Notifiable + ?Sized,
        M: Notification<N> + ?Sized,
    {
        let Some(message) = self.prepare(notifiable, notification) else {
            debug!("Notification produced no message; skipping");
            return Ok(None);
        };

        self.client.send(&message).await.map(Some)
    }
}

/// Route override, then postal address, then raw attributes
fn resolve_recipient<N: Notifiable + ?Sized>(notifiable: &N) -> Option<Address> {
    notifiable
        .route_notification_for_check_writer()
        .or_else(|| notifiable.postal_address())
        .or_else(|| {
            notifiable
                .address_attributes()
                .and_then(|attrs| address_from_attributes(&attrs))
        })
}

fn address_from_attributes(attributes: &Map<String, Value>) -> Option<Address> {
    let mut address = Address::from_map(attributes);
    if address.address_line_1.is_none() {
        return None;
    }

    if address.country.is_none() {
        address.country = Some(DEFAULT_COUNTRY.to_string());
    }
    Some(address)
}
