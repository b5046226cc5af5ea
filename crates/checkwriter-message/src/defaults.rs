//! Delivery tiers and process-wide message defaults

use crate::{Address, Error, Result};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt;
use std::str::FromStr;

/// Delivery speed tier, sent on the wire as `shippingTypeId`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize_repr, Deserialize_repr,
)]
#[repr(u8)]
pub enum ShippingType {
    Standard = 1,
    Express = 2,
    #[default]
    Priority = 3,
}

impl ShippingType {
    /// Numeric id used by the API
    pub fn id(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ShippingType {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self> {
        match id {
            1 => Ok(ShippingType::Standard),
            2 => Ok(ShippingType::Express),
            3 => Ok(ShippingType::Priority),
            other => Err(Error::InvalidShippingType(other.to_string())),
        }
    }
}

impl FromStr for ShippingType {
    type Err = Error;

    /// Accepts the numeric id or the tier name
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "standard" => Ok(ShippingType::Standard),
            "2" | "express" => Ok(ShippingType::Express),
            "3" | "priority" => Ok(ShippingType::Priority),
            _ => Err(Error::InvalidShippingType(s.to_string())),
        }
    }
}

impl fmt::Display for ShippingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShippingType::Standard => write!(f, "standard"),
            ShippingType::Express => write!(f, "express"),
            ShippingType::Priority => write!(f, "priority"),
        }
    }
}

/// Defaults applied when a message leaves a field unset
///
/// Built once from configuration and passed to every payload call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailDefaults {
    /// Return address for messages without an explicit sender
    pub sender: Option<Address>,
    /// Bank account for checks without an explicit account
    pub bank_account_id: Option<String>,
    /// Shipping tier for document mail
    pub shipping_type: ShippingType,
}

impl MailDefaults {
    /// Sender resolution: explicit sender, then the configured default, then empty
    pub fn resolve_sender(&self, explicit: Option<&Address>) -> Address {
        explicit
            .filter(|sender| !sender.is_empty())
            .or(self.sender.as_ref())
            .cloned()
            .unwrap_or_default()
    }

    /// Bank account resolution: explicit id, then the configured default
    pub fn resolve_bank_account(&self, explicit: Option<&String>) -> Option<String> {
        crate::non_empty(explicit).or_else(|| crate::non_empty(self.bank_account_id.as_ref()))
    }
}
