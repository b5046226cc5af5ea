//! Mail artifact builders for the OnlineCheckWriter API
//!
//! Type-safe construction of documents, checks, letters and postcards, and
//! their serialization into the JSON payload each endpoint expects.
//!
//! This crate does no I/O. Process-wide defaults (sender, bank account,
//! shipping tier) are passed in explicitly through [`MailDefaults`].
//!
//! # Example
//!
//! ```
//! use checkwriter_message::{MailCheck, MailDefaults};
//!
//! let check = MailCheck::create()
//!     .bank_account("b1")
//!     .amount(500.0)
//!     .memo("Invoice Payment")
//!     .name("Jane")
//!     .city("Austin")
//!     .state("TX")
//!     .zip("73301");
//!
//! let payload = serde_json::to_value(check.payload(&MailDefaults::default()))?;
//! assert_eq!(payload["destination"]["shippingTypeId"], 1);
//! assert_eq!(payload["source"]["accountId"], "b1");
//! # Ok::<(), serde_json::Error>(())
//! ```

mod address;
mod check;
mod defaults;
mod document_mail;
mod letter;
mod mail_check;
mod message;
mod postcard;

use thiserror::Error;

pub use address::{format_address, Address, FormattedAddress, PostalFields, DEFAULT_COUNTRY};
pub use check::{Check, CheckPayload};
pub use defaults::{MailDefaults, ShippingType};
pub use document_mail::{
    AttachmentSource, DocumentMail, DocumentMailPayload, DEFAULT_ATTACHMENT_TITLE,
};
pub use letter::{Letter, LetterContent, LetterPayload};
pub use mail_check::{
    MailCheck, MailCheckDestination, MailCheckPayload, MailCheckSource, PaymentDetails,
};
pub use message::{Message, MessageKind};
pub use postcard::{Postcard, PostcardBack, PostcardFront, PostcardPayload};

/// Errors raised while building messages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid shipping type '{0}': expected 1 (standard), 2 (express) or 3 (priority)")]
    InvalidShippingType(String),
}

/// Result type for message operations
pub type Result<T> = std::result::Result<T, Error>;

/// Merge key/value entries into a JSON object, overwriting repeated keys.
pub(crate) fn merge_entries<K, V>(
    target: &mut serde_json::Map<String, serde_json::Value>,
    entries: impl IntoIterator<Item = (K, V)>,
) where
    K: Into<String>,
    V: Into<serde_json::Value>,
{
    for (key, value) in entries {
        target.insert(key.into(), value.into());
    }
}

/// Returns `None` for blank strings.
pub(crate) fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}
