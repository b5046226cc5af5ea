//! Mail check: issue and physically mail a check in one call
//! (`quickpay/mailcheck`)
//!
//! Unlike the other artifacts, a mail check carries no return address or
//! metadata; the service prints the account holder's details.

use crate::{Address, MailDefaults, PostalFields, ShippingType};
use chrono::NaiveDate;
use serde::Serialize;

/// Account type used when none is set
pub const DEFAULT_ACCOUNT_TYPE: &str = "bankaccount";

/// Builder for a mailed check
#[derive(Debug, Clone, PartialEq)]
pub struct MailCheck {
    bank_account_id: Option<String>,
    account_type: String,
    amount: f64,
    memo: Option<String>,
    note: Option<String>,
    issue_date: Option<NaiveDate>,
    recipient: Address,
    shipping_type: ShippingType,
}

impl Default for MailCheck {
    fn default() -> Self {
        Self {
            bank_account_id: None,
            account_type: DEFAULT_ACCOUNT_TYPE.to_string(),
            amount: 0.0,
            memo: None,
            note: None,
            issue_date: None,
            recipient: Address::default(),
            shipping_type: ShippingType::Standard,
        }
    }
}

impl MailCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create() -> Self {
        Self::new()
    }

    pub fn bank_account(mut self, id: impl Into<String>) -> Self {
        self.bank_account_id = Some(id.into());
        self
    }

    pub fn account_type(mut self, account_type: impl Into<String>) -> Self {
        self.account_type = account_type.into();
        self
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    /// Memo printed on the check
    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Internal note, never printed
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn issue_date(mut self, date: NaiveDate) -> Self {
        self.issue_date = Some(date);
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

    pub fn shipping_type(mut self, shipping_type: ShippingType) -> Self {
        self.shipping_type = shipping_type;
        self
    }

    /// Copy the fields present in `address` onto the recipient
    ///
    /// Fields missing from `address` keep their current value, so `to`
    /// combines with the individual setters.
    pub fn to(mut self, address: Address) -> Self {
        self.set_recipient(address);
        self
    }

    pub(crate) fn set_recipient(&mut self, address: Address) {
        let recipient = &mut self.recipient;
        let fields = [
            (&mut recipient.name, address.name),
            (&mut recipient.company, address.company),
            (&mut recipient.address_line_1, address.address_line_1),
            (&mut recipient.address_line_2, address.address_line_2),
            (&mut recipient.city, address.city),
            (&mut recipient.state, address.state),
            (&mut recipient.zip, address.zip),
            (&mut recipient.phone, address.phone),
            (&mut recipient.email, address.email),
        ];
        for (slot, value) in fields {
            if value.is_some() {
                *slot = value;
            }
        }
    }

    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    pub fn has_recipient(&self) -> bool {
        !self.recipient.is_empty()
    }

    pub fn payload(&self, defaults: &MailDefaults) -> MailCheckPayload {
        MailCheckPayload {
            source: MailCheckSource {
                account_type: self.account_type.clone(),
                account_id: defaults.resolve_bank_account(self.bank_account_id.as_ref()),
            },
            destination: MailCheckDestination {
                recipient: PostalFields::from_address(&self.recipient),
                shipping_type: self.shipping_type,
            },
            payment_details: PaymentDetails {
                amount: self.amount,
                memo: crate::non_empty(self.memo.as_ref()),
                note: crate::non_empty(self.note.as_ref()),
                issue_date: self.issue_date,
            },
        }
    }
}

/// Wire payload for `quickpay/mailcheck`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MailCheckPayload {
    pub source: MailCheckSource,
    pub destination: MailCheckDestination,
    pub payment_details: PaymentDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailCheckSource {
    #[serde(rename = "accountType")]
    pub account_type: String,
    #[serde(rename = "accountId", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailCheckDestination {
    #[serde(flatten)]
    pub recipient: PostalFields,
    #[serde(rename = "shippingTypeId")]
    pub shipping_type: ShippingType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentDetails {
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "issueDate", skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
}
