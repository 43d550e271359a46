//! Application settings loading from config.toml
//!
//! The settings file carries the database location and the payment-gateway
//! credentials. Environment variables (`DATABASE_URL`, `PAYMENT_KEY_ID`,
//! `PAYMENT_KEY_SECRET`) override file values so deployments can keep
//! secrets out of the file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// SeaORM connection string (e.g. `sqlite://data/slotbook.sqlite`)
    pub database_url: String,
    /// Payment-gateway credentials and currency
    pub payment: PaymentConfig,
}

/// Payment-gateway section of config.toml
#[derive(Debug, Deserialize, Clone)]
pub struct PaymentConfig {
    /// API key id issued by the gateway
    pub key_id: String,
    /// API key secret issued by the gateway
    pub key_secret: String,
    /// ISO currency code used for orders (e.g. "INR")
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "INR".to_string()
}

/// Loads application settings from a TOML file, then applies environment
/// variable overrides.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    let mut config: AppConfig = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.database_url = url;
    }
    if let Ok(key_id) = std::env::var("PAYMENT_KEY_ID") {
        config.payment.key_id = key_id;
    }
    if let Ok(key_secret) = std::env::var("PAYMENT_KEY_SECRET") {
        config.payment.key_secret = key_secret;
    }

    Ok(config)
}

/// Loads settings from the default location (./config.toml)
pub fn load_default_config() -> Result<AppConfig> {
    load_config("config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_app_config() {
        let toml_str = r#"
            database_url = "sqlite::memory:"

            [payment]
            key_id = "rzp_test_key"
            key_secret = "rzp_test_secret"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.payment.key_id, "rzp_test_key");
        assert_eq!(config.payment.currency, "INR");
    }

    #[test]
    fn test_parse_app_config_custom_currency() {
        let toml_str = r#"
            database_url = "sqlite://data/slotbook.sqlite"

            [payment]
            key_id = "k"
            key_secret = "s"
            currency = "USD"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.payment.currency, "USD");
    }

    #[test]
    fn test_missing_payment_section_rejected() {
        let toml_str = r#"database_url = "sqlite::memory:""#;
        let parsed: std::result::Result<AppConfig, _> = toml::from_str(toml_str);
        assert!(parsed.is_err());
    }
}
