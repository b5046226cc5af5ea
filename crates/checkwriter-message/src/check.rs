//! Printed checks (`checks` endpoint)

use crate::{format_address, merge_entries, non_empty, Address, FormattedAddress, MailDefaults};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

/// Mail class used when none is set
pub const DEFAULT_MAIL_CLASS: &str = "first_class";

/// Builder for a printed check
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    bank_account_id: Option<String>,
    amount: f64,
    payee_name: Option<String>,
    memo: Option<String>,
    check_number: Option<String>,
    check_date: Option<NaiveDate>,
    mail: bool,
    mail_class: String,
    attachments: Vec<String>,
    recipient: Address,
    sender: Option<Address>,
    description: Option<String>,
    metadata: Map<String, Value>,
}

impl Default for Check {
    fn default() -> Self {
        Self {
            bank_account_id: None,
            amount: 0.0,
            payee_name: None,
            memo: None,
            check_number: None,
            check_date: None,
            mail: true,
            mail_class: DEFAULT_MAIL_CLASS.to_string(),
            attachments: Vec::new(),
            recipient: Address::default(),
            sender: None,
            description: None,
            metadata: Map::new(),
        }
    }
}

impl Check {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create() -> Self {
        Self::new()
    }

    /// Account to draw on; the configured default applies when unset
    pub fn bank_account(mut self, id: impl Into<String>) -> Self {
        self.bank_account_id = Some(id.into());
        self
    }

    /// Amount in dollars
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    /// Name printed on the pay-to line; defaults to the recipient's name
    pub fn payee(mut self, name: impl Into<String>) -> Self {
        self.payee_name = Some(name.into());
        self
    }

    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    pub fn check_number(mut self, number: impl Into<String>) -> Self {
        self.check_number = Some(number.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.check_date = Some(date);
        self
    }

    /// Whether the service should mail the printed check
    pub fn mail(mut self, mail: bool) -> Self {
        self.mail = mail;
        self
    }

    pub fn mail_class(mut self, class: impl Into<String>) -> Self {
        self.mail_class = class.into();
        self
    }

    /// Append one document id to the enclosures
    pub fn attach(mut self, document_id: impl Into<String>) -> Self {
        self.attachments.push(document_id.into());
        self
    }

    /// Append several document ids, keeping order
    pub fn attachments<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.attachments.extend(ids.into_iter().map(Into::into));
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

    pub fn payload(&self, defaults: &MailDefaults) -> CheckPayload {
        CheckPayload {
            bank_account_id: defaults.resolve_bank_account(self.bank_account_id.as_ref()),
            amount: self.amount,
            payee: non_empty(self.payee_name.as_ref())
                .or_else(|| non_empty(self.recipient.name.as_ref())),
            recipient: format_address(&self.recipient),
            sender: format_address(&defaults.resolve_sender(self.sender.as_ref())),
            mail: self.mail,
            memo: non_empty(self.memo.as_ref()),
            check_number: non_empty(self.check_number.as_ref()),
            check_date: self.check_date,
            mail_class: non_empty(Some(&self.mail_class)),
            attachments: self.attachments.clone(),
            description: non_empty(self.description.as_ref()),
            metadata: self.metadata.clone(),
        }
    }
}

/// Wire payload for `checks`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_id: Option<String>,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payee: Option<String>,
    pub recipient: FormattedAddress,
    pub sender: FormattedAddress,
    pub mail: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail_class: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn to_json(check: &Check, defaults: &MailDefaults) -> Value {
        serde_json::to_value(check.payload(defaults)).unwrap()
    }

    #[test]
    fn test_minimal_check() {
        let payload = to_json(&Check::create(), &MailDefaults::default());
        assert_eq!(
            payload,
            json!({
                "amount": 0.0,
                "recipient": { "country": "US" },
                "sender": { "country": "US" },
                "mail": true,
                "mail_class": "first_class",
            })
        );
    }

    #[test]
    fn test_payee_falls_back_to_recipient_name() {
        let check = Check::new().to(Address::new().with_name("Jane Roe").with_city("Austin"));
        assert_eq!(to_json(&check, &MailDefaults::default())["payee"], "Jane Roe");

        let explicit = check.payee("Roe Holdings");
        assert_eq!(to_json(&explicit, &MailDefaults::default())["payee"], "Roe Holdings");
    }

    #[test]
    fn test_payee_omitted_without_any_name() {
        let check = Check::new().payee("  ").to(Address::new().with_company("Roe LLC"));
        let payload = to_json(&check, &MailDefaults::default());
        assert!(payload.get("payee").is_none());
        assert_eq!(check.payload(&MailDefaults::default()).payee, None);
    }

    #[test]
    fn test_bank_account_default() {
        let defaults = MailDefaults {
            bank_account_id: Some("acct-default".to_string()),
            ..Default::default()
        };
        assert_eq!(to_json(&Check::new(), &defaults)["bank_account_id"], "acct-default");
        assert_eq!(
            to_json(&Check::new().bank_account("acct-1"), &defaults)["bank_account_id"],
            "acct-1"
        );
    }

    #[test]
    fn test_optional_fields() {
        let check = Check::new()
            .amount(125.5)
            .memo("Rent")
            .check_number("1001")
            .date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
            .mail(false)
            .mail_class("priority")
            .description("March rent");

        let payload = to_json(&check, &MailDefaults::default());
        assert_eq!(payload["amount"].as_f64(), Some(125.5));
        assert_eq!(payload["memo"], "Rent");
        assert_eq!(payload["check_number"], "1001");
        assert_eq!(payload["check_date"], "2024-03-15");
        assert_eq!(payload["mail"], false);
        assert_eq!(payload["mail_class"], "priority");
        assert_eq!(payload["description"], "March rent");
    }

    #[test]
    fn test_attachments_append() {
        let check = Check::new()
            .attach("doc-1")
            .attachments(["doc-2", "doc-3"])
            .attach("doc-1");

        assert_eq!(
            to_json(&check, &MailDefaults::default())["attachments"],
            json!(["doc-1", "doc-2", "doc-3", "doc-1"])
        );
    }

    #[test]
    fn test_recipient_uses_generic_shape() {
        let check = Check::new().to(Address::from_map(
            json!({ "name": "A", "address1": "1 Main", "postal_code": "10001" })
                .as_object()
                .unwrap(),
        ));
        assert_eq!(
            to_json(&check, &MailDefaults::default())["recipient"],
            json!({ "name": "A", "address_line_1": "1 Main", "zip": "10001", "country": "US" })
        );
    }

    #[test]
    fn test_explicit_sender_overrides_default() {
        let defaults = MailDefaults {
            sender: Some(Address::new().with_name("Default")),
            ..Default::default()
        };
        let check = Check::new().from(Address::new().with_name("Explicit"));
        assert_eq!(to_json(&check, &defaults)["sender"]["name"], "Explicit");
        assert_eq!(to_json(&Check::new(), &defaults)["sender"]["name"], "Default");
    }
}
