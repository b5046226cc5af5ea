//! checkwriter configuration file handling
//!
//! Loads ~/.config/checkwriter/config.yaml. Every setting can be overridden
//! by an `ONLINECHECKWRITER_*` environment variable.

use crate::{CheckWriterError, Result};
use checkwriter_message::{Address, MailDefaults, ShippingType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Production API endpoint
pub const PRODUCTION_BASE_URL: &str = "https://api.onlinecheckwriter.com/api/v3";

/// Sandbox API endpoint
pub const SANDBOX_BASE_URL: &str = "https://test.onlinecheckwriter.com/api/v3";

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "ONLINECHECKWRITER_";

/// Which family of endpoints the account uses
///
/// `quickpay` routes document mail and mail checks. `legacy` routes
/// document mail, checks, letters and postcards and is deprecated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    #[default]
    Quickpay,
    Legacy,
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edition::Quickpay => write!(f, "quickpay"),
            Edition::Legacy => write!(f, "legacy"),
        }
    }
}

impl FromStr for Edition {
    type Err = CheckWriterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "quickpay" => Ok(Edition::Quickpay),
            "legacy" => Ok(Edition::Legacy),
            other => Err(CheckWriterError::Config(format!(
                "Invalid edition '{}'. Must be one of: quickpay, legacy",
                other
            ))),
        }
    }
}

/// Retry policy for idempotent requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Total attempts, including the first
    #[serde(default = "default_retry_times")]
    pub times: u32,

    /// Pause between attempts, in milliseconds
    #[serde(default = "default_retry_sleep")]
    pub sleep: u64,
}

fn default_retry_times() -> u32 {
    3
}

fn default_retry_sleep() -> u64 {
    100
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            times: default_retry_times(),
            sleep: default_retry_sleep(),
        }
    }
}

/// checkwriter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckWriterConfig {
    /// API key sent as a bearer token
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub edition: Edition,

    /// Return address for messages that do not set one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sender: Option<Address>,

    /// Shipping tier for document mail that does not set one
    #[serde(default)]
    pub default_shipping_type: ShippingType,

    /// Bank account for checks that do not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_bank_account_id: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub retry: RetrySettings,
}

fn default_base_url() -> String {
    PRODUCTION_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl CheckWriterConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            edition: Edition::default(),
            default_sender: None,
            default_shipping_type: ShippingType::default(),
            default_bank_account_id: None,
            timeout: default_timeout(),
            retry: RetrySettings::default(),
        }
    }

    /// Point at the sandbox endpoint
    pub fn sandbox(mut self) -> Self {
        self.base_url = SANDBOX_BASE_URL.to_string();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_edition(mut self, edition: Edition) -> Self {
        self.edition = edition;
        self
    }

    pub fn with_default_sender(mut self, sender: Address) -> Self {
        self.default_sender = Some(sender);
        self
    }

    pub fn with_default_bank_account(mut self, id: impl Into<String>) -> Self {
        self.default_bank_account_id = Some(id.into());
        self
    }

    /// Defaults threaded into message payloads
    pub fn mail_defaults(&self) -> MailDefaults {
        MailDefaults {
            sender: self
                .default_sender
                .clone()
                .filter(|sender| !sender.is_empty()),
            bank_account_id: self
                .default_bank_account_id
                .clone()
                .filter(|id| !id.trim().is_empty()),
            shipping_type: self.default_shipping_type,
        }
    }

    /// Load configuration from the default path (~/.config/checkwriter/config.yaml)
    pub fn load_default() -> Result<Self> {
        Self::load(Self::default_path())
    }

    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CheckWriterError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading checkwriter configuration");

        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;

        tracing::debug!(
            base_url = %config.base_url,
            edition = %config.edition,
            has_sender = config.default_sender.is_some(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Build configuration from environment variables alone
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new("");
        config.apply_env()?;
        Ok(config)
    }

    /// Override settings from `ONLINECHECKWRITER_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Override settings from a variable lookup
    ///
    /// `lookup` receives the full variable name, e.g.
    /// `ONLINECHECKWRITER_API_KEY`. Blank values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| {
            lookup(&format!("{}{}", ENV_PREFIX, suffix)).filter(|v| !v.trim().is_empty())
        };

        if let Some(api_key) = var("API_KEY") {
            self.api_key = api_key;
        }
        if let Some(base_url) = var("BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(shipping) = var("SHIPPING_TYPE") {
            self.default_shipping_type = shipping.parse()?;
        }
        if let Some(bank_account) = var("BANK_ACCOUNT_ID") {
            self.default_bank_account_id = Some(bank_account);
        }
        if let Some(timeout) = var("TIMEOUT") {
            self.timeout = timeout.trim().parse().map_err(|_| {
                CheckWriterError::Config(format!(
                    "{}TIMEOUT must be a whole number of seconds, got '{}'",
                    ENV_PREFIX, timeout
                ))
            })?;
        }

        let sender_vars = [
            ("SENDER_NAME", var("SENDER_NAME")),
            ("SENDER_COMPANY", var("SENDER_COMPANY")),
            ("SENDER_ADDRESS_1", var("SENDER_ADDRESS_1")),
            ("SENDER_ADDRESS_2", var("SENDER_ADDRESS_2")),
            ("SENDER_CITY", var("SENDER_CITY")),
            ("SENDER_STATE", var("SENDER_STATE")),
            ("SENDER_ZIP", var("SENDER_ZIP")),
            ("SENDER_PHONE", var("SENDER_PHONE")),
        ];

        if sender_vars.iter().any(|(_, value)| value.is_some()) {
            let sender = self.default_sender.get_or_insert_with(Address::default);
            for (suffix, value) in sender_vars {
                let Some(value) = value else { continue };
                let slot = match suffix {
                    "SENDER_NAME" => &mut sender.name,
                    "SENDER_COMPANY" => &mut sender.company,
                    "SENDER_ADDRESS_1" => &mut sender.address_line_1,
                    "SENDER_ADDRESS_2" => &mut sender.address_line_2,
                    "SENDER_CITY" => &mut sender.city,
                    "SENDER_STATE" => &mut sender.state,
                    "SENDER_ZIP" => &mut sender.zip,
                    _ => &mut sender.phone,
                };
                *slot = Some(value);
            }
        }

        Ok(())
    }

    /// Save configuration to the default path
    pub fn save_default(&self) -> Result<()> {
        self.save(Self::default_path())
    }

    /// Save configuration to a specific path
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::info!(path = %path.display(), "Saving checkwriter configuration");

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    /// Get the default config path (~/.config/checkwriter/config.yaml)
    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".config");
        path.push("checkwriter");
        path.push("config.yaml");
        path
    }
}

impl Default for CheckWriterConfig {
    fn default() -> Self {
        Self::new("")
    }
}
