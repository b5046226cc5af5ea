//! Postal addresses and their wire formats
//!
//! Callers and notifiable entities spell address fields two ways:
//! `address_line_1` / `address_line_2` / `zip` or `address1` / `address2` /
//! `postal_code`. [`Address`] accepts both and stores one canonical shape.
//! Each endpoint then renders it in its own convention:
//!
//! - [`FormattedAddress`]: generic `address_line_*` shape used by checks,
//!   letters, postcards and address verification
//! - [`PostalFields`]: flat `address1` / `address2` shape used by document
//!   mail and mail checks
//!
//! Blank fields never reach the wire.

use crate::non_empty;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Country used when an address does not name one
pub const DEFAULT_COUNTRY: &str = "US";

/// A postal address
///
/// Deserializes from either naming convention. When both spellings of a
/// field are present, `address_line_*` wins over `address*` and `zip` wins
/// over `postal_code`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Address {
    /// Create an empty address
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an address from a loosely-typed attribute map
    ///
    /// String and numeric values are accepted (`"zip": 75001` is common in
    /// hand-written fixtures); blank strings count as absent.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            name: lookup(map, &["name"]),
            company: lookup(map, &["company"]),
            address_line_1: lookup(map, &["address_line_1", "address1"]),
            address_line_2: lookup(map, &["address_line_2", "address2"]),
            city: lookup(map, &["city"]),
            state: lookup(map, &["state"]),
            zip: lookup(map, &["zip", "postal_code"]),
            country: lookup(map, &["country"]),
            phone: lookup(map, &["phone"]),
            email: lookup(map, &["email"]),
        }
    }

    /// True when no field carries a non-blank value
    pub fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.company,
            &self.address_line_1,
            &self.address_line_2,
            &self.city,
            &self.state,
            &self.zip,
            &self.country,
            &self.phone,
            &self.email,
        ]
        .iter()
        .all(|field| non_empty(field.as_ref()).is_none())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_address_line_1(mut self, line: impl Into<String>) -> Self {
        self.address_line_1 = Some(line.into());
        self
    }

    pub fn with_address_line_2(mut self, line: impl Into<String>) -> Self {
        self.address_line_2 = Some(line.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_zip(mut self, zip: impl Into<String>) -> Self {
        self.zip = Some(zip.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl From<Map<String, Value>> for Address {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_map(&map)
    }
}

/// First non-blank value among `keys`, in order
fn lookup(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match map.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Generic address shape (`address_line_1` convention)
///
/// Phone and email are not part of this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    pub country: String,
}

/// Normalize an address into the generic wire shape
///
/// Blank fields are dropped and `country` falls back to [`DEFAULT_COUNTRY`].
pub fn format_address(address: &Address) -> FormattedAddress {
    FormattedAddress {
        name: non_empty(address.name.as_ref()),
        company: non_empty(address.company.as_ref()),
        address_line_1: non_empty(address.address_line_1.as_ref()),
        address_line_2: non_empty(address.address_line_2.as_ref()),
        city: non_empty(address.city.as_ref()),
        state: non_empty(address.state.as_ref()),
        zip: non_empty(address.zip.as_ref()),
        country: non_empty(address.country.as_ref())
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
    }
}

impl From<&Address> for FormattedAddress {
    fn from(address: &Address) -> Self {
        format_address(address)
    }
}

/// Flat address shape (`address1` convention)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostalFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl PostalFields {
    /// Render an address in the flat convention, dropping blank fields
    pub fn from_address(address: &Address) -> Self {
        Self {
            name: non_empty(address.name.as_ref()),
            company: non_empty(address.company.as_ref()),
            address1: non_empty(address.address_line_1.as_ref()),
            address2: non_empty(address.address_line_2.as_ref()),
            city: non_empty(address.city.as_ref()),
            state: non_empty(address.state.as_ref()),
            zip: non_empty(address.zip.as_ref()),
            phone: non_empty(address.phone.as_ref()),
            email: non_empty(address.email.as_ref()),
        }
    }

    /// Drop the email field (return addresses carry no email)
    pub fn without_email(mut self) -> Self {
        self.email = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_both_conventions_normalize_identically() {
        let short = Address::from_map(&map(json!({
            "name": "Jane Smith",
            "address1": "456 Oak Ave",
            "address2": "Suite 9",
            "city": "Austin",
            "state": "TX",
            "postal_code": "73301",
        })));
        let long = Address::from_map(&map(json!({
            "name": "Jane Smith",
            "address_line_1": "456 Oak Ave",
            "address_line_2": "Suite 9",
            "city": "Austin",
            "state": "TX",
            "zip": "73301",
        })));

        assert_eq!(short, long);
        assert_eq!(format_address(&short), format_address(&long));
    }

    #[test]
    fn test_canonical_spelling_wins_when_both_present() {
        let address = Address::from_map(&map(json!({
            "address_line_1": "1 Canonical Rd",
            "address1": "2 Alias St",
            "zip": "10001",
            "postal_code": "99999",
        })));

        assert_eq!(address.address_line_1.as_deref(), Some("1 Canonical Rd"));
        assert_eq!(address.zip.as_deref(), Some("10001"));
    }

    #[test]
    fn test_blank_alias_falls_through_to_other_spelling() {
        let address = Address::from_map(&map(json!({
            "address_line_1": "",
            "address1": "2 Alias St",
        })));
        assert_eq!(address.address_line_1.as_deref(), Some("2 Alias St"));
    }

    #[test]
    fn test_numeric_values_accepted() {
        let address = Address::from_map(&map(json!({ "zip": 75001 })));
        assert_eq!(address.zip.as_deref(), Some("75001"));
    }

    #[test]
    fn test_format_drops_empty_fields_and_defaults_country() {
        let address = Address::new()
            .with_name("John Doe")
            .with_company("")
            .with_city("New York")
            .with_phone("5551234567");

        let formatted = serde_json::to_value(format_address(&address)).unwrap();
        assert_eq!(
            formatted,
            json!({ "name": "John Doe", "city": "New York", "country": "US" })
        );
    }

    #[test]
    fn test_format_keeps_explicit_country() {
        let address = Address::new().with_country("CA");
        assert_eq!(format_address(&address).country, "CA");
    }

    #[test]
    fn test_deserialize_accepts_alias_fields() {
        let address: Address = serde_json::from_value(json!({
            "name": "Postal Name",
            "address1": "456 Postal Ave",
            "city": "Postal City",
            "state": "CA",
            "zip": "90001",
        }))
        .unwrap();

        assert_eq!(address.address_line_1.as_deref(), Some("456 Postal Ave"));
        assert_eq!(address.city.as_deref(), Some("Postal City"));
    }

    #[test]
    fn test_serialize_uses_canonical_names() {
        let address = Address::new().with_address_line_1("1 Main St");
        let value = serde_json::to_value(&address).unwrap();
        assert_eq!(value, json!({ "address_line_1": "1 Main St" }));
    }

    #[test]
    fn test_postal_fields_use_flat_names() {
        let address = Address::new()
            .with_address_line_1("123 Main St")
            .with_address_line_2("")
            .with_zip("10001")
            .with_email("a@example.com");

        let postal = PostalFields::from_address(&address);
        let value = serde_json::to_value(&postal).unwrap();
        assert_eq!(
            value,
            json!({ "address1": "123 Main St", "zip": "10001", "email": "a@example.com" })
        );
        assert!(postal.without_email().email.is_none());
    }

    #[test]
    fn test_is_empty_ignores_blank_values() {
        assert!(Address::new().is_empty());
        assert!(Address::new().with_city("  ").is_empty());
        assert!(!Address::new().with_city("Austin").is_empty());
    }
}
