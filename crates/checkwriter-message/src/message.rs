//! The closed set of mail artifacts

use crate::{Address, Check, DocumentMail, Letter, MailCheck, MailDefaults, Postcard};
use serde_json::Value;
use std::fmt;

/// Any message the client can send
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    DocumentMail(DocumentMail),
    Check(Check),
    MailCheck(MailCheck),
    Letter(Letter),
    Postcard(Postcard),
}

/// Discriminant of a [`Message`], used in logs and errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    DocumentMail,
    Check,
    MailCheck,
    Letter,
    Postcard,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageKind::DocumentMail => "document_mail",
            MessageKind::Check => "check",
            MessageKind::MailCheck => "mail_check",
            MessageKind::Letter => "letter",
            MessageKind::Postcard => "postcard",
        };
        f.write_str(name)
    }
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::DocumentMail(_) => MessageKind::DocumentMail,
            Message::Check(_) => MessageKind::Check,
            Message::MailCheck(_) => MessageKind::MailCheck,
            Message::Letter(_) => MessageKind::Letter,
            Message::Postcard(_) => MessageKind::Postcard,
        }
    }

    pub fn has_recipient(&self) -> bool {
        match self {
            Message::DocumentMail(m) => m.has_recipient(),
            Message::Check(m) => m.has_recipient(),
            Message::MailCheck(m) => m.has_recipient(),
            Message::Letter(m) => m.has_recipient(),
            Message::Postcard(m) => m.has_recipient(),
        }
    }

    /// Replace the recipient (merged for mail checks)
    pub fn set_recipient(&mut self, address: Address) {
        match self {
            Message::DocumentMail(m) => m.set_recipient(address),
            Message::Check(m) => m.set_recipient(address),
            Message::MailCheck(m) => m.set_recipient(address),
            Message::Letter(m) => m.set_recipient(address),
            Message::Postcard(m) => m.set_recipient(address),
        }
    }

    /// Mail checks never carry a sender
    pub fn has_sender(&self) -> bool {
        match self {
            Message::DocumentMail(m) => m.has_sender(),
            Message::Check(m) => m.has_sender(),
            Message::MailCheck(_) => false,
            Message::Letter(m) => m.has_sender(),
            Message::Postcard(m) => m.has_sender(),
        }
    }

    /// Set the return address; ignored by mail checks
    pub fn set_sender(&mut self, address: Address) {
        match self {
            Message::DocumentMail(m) => m.set_sender(address),
            Message::Check(m) => m.set_sender(address),
            Message::MailCheck(_) => {}
            Message::Letter(m) => m.set_sender(address),
            Message::Postcard(m) => m.set_sender(address),
        }
    }

    /// Serialize the payload for this message's endpoint
    ///
    /// Document mail is rendered with its own attachment URL, if any.
    pub fn to_value(&self, defaults: &MailDefaults) -> serde_json::Result<Value> {
        match self {
            Message::DocumentMail(m) => serde_json::to_value(m.payload(defaults, None)),
            Message::Check(m) => serde_json::to_value(m.payload(defaults)),
            Message::MailCheck(m) => serde_json::to_value(m.payload(defaults)),
            Message::Letter(m) => serde_json::to_value(m.payload(defaults)),
            Message::Postcard(m) => serde_json::to_value(m.payload(defaults)),
        }
    }
}

impl From<DocumentMail> for Message {
    fn from(message: DocumentMail) -> Self {
        Message::DocumentMail(message)
    }
}

impl From<Check> for Message {
    fn from(message: Check) -> Self {
        Message::Check(message)
    }
}

impl From<MailCheck> for Message {
    fn from(message: MailCheck) -> Self {
        Message::MailCheck(message)
    }
}

impl From<Letter> for Message {
    fn from(message: Letter) -> Self {
        Message::Letter(message)
    }
}

impl From<Postcard> for Message {
    fn from(message: Postcard) -> Self {
        Message::Postcard(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(Message::from(DocumentMail::new()).kind().to_string(), "document_mail");
        assert_eq!(Message::from(Check::new()).kind().to_string(), "check");
        assert_eq!(Message::from(MailCheck::new()).kind().to_string(), "mail_check");
        assert_eq!(Message::from(Letter::new()).kind().to_string(), "letter");
        assert_eq!(Message::from(Postcard::new()).kind().to_string(), "postcard");
    }

    #[test]
    fn test_set_recipient_through_enum() {
        let mut message = Message::from(Letter::new());
        assert!(!message.has_recipient());

        message.set_recipient(Address::new().with_name("Ada"));
        assert!(message.has_recipient());

        match &message {
            Message::Letter(letter) => assert_eq!(letter.recipient().name.as_deref(), Some("Ada")),
            other => panic!("unexpected variant {:?}", other.kind()),
        }
    }

    #[test]
    fn test_mail_check_ignores_sender() {
        let mut message = Message::from(MailCheck::new());
        message.set_sender(Address::new().with_name("Ignored"));
        assert!(!message.has_sender());

        let mut document = Message::from(DocumentMail::new());
        document.set_sender(Address::new().with_name("Sender"));
        assert!(document.has_sender());
    }

    #[test]
    fn test_to_value_matches_payload() {
        let defaults = MailDefaults::default();
        let check = MailCheck::new().amount(10.0).name("Jane");
        let via_enum = Message::from(check.clone()).to_value(&defaults).unwrap();
        assert_eq!(via_enum, serde_json::to_value(check.payload(&defaults)).unwrap());
    }
}
