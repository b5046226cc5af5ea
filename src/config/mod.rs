//! Configuration system
//!
//! Loads ~/.config/checkwriter/config.yaml with support for:
//! - API credentials and production/sandbox endpoints
//! - The API edition (quickpay or legacy endpoints)
//! - Default sender, bank account and shipping tier
//! - Request timeout and retry policy
//! - `ONLINECHECKWRITER_*` environment overrides

mod checkwriter_config;
pub mod validation;

pub use checkwriter_config::{
    CheckWriterConfig, Edition, RetrySettings, ENV_PREFIX, PRODUCTION_BASE_URL, SANDBOX_BASE_URL,
};
pub use validation::{validate_config, validate_config_result, ValidationError};
