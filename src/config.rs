//! Checkout configuration.
//!
//! A [`CheckoutConfiguration`] is either built in code or loaded from a JSON
//! file. Every field except `client_key` has a default:
//!
//! ```json
//! {
//!   "client_key": "test_XXXX",
//!   "public_key": "10001|ABCD...",
//!   "supported_brands": ["visa", "mc", "amex"],
//!   "holder_name_required": true,
//!   "cvc_visibility": "hide_first"
//! }
//! ```

use crate::card::{CardBrand, CardType};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// When the security code field is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CvcVisibility {
    /// Always shown; required unless the brand says otherwise.
    #[default]
    AlwaysShow,
    /// Hidden until a detected brand requires it.
    HideFirst,
    /// Never shown.
    AlwaysHide,
}

/// Brands accepted when the configuration does not name any.
pub const DEFAULT_SUPPORTED_BRANDS: [CardType; 3] = [
    CardType::Visa,
    CardType::AmericanExpress,
    CardType::Mastercard,
];

/// Configuration of a checkout session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutConfiguration {
    /// Client key used to authenticate BIN lookups.
    pub client_key: String,

    /// Public key used to encrypt the BIN. Without it no lookup is made.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    /// Brands the merchant accepts.
    #[serde(default = "default_supported_brands")]
    pub supported_brands: Vec<CardBrand>,

    /// Value of the `type` field sent with BIN lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,

    /// Whether the holder name must be entered.
    #[serde(default)]
    pub holder_name_required: bool,

    /// When the security code field is shown.
    #[serde(default)]
    pub cvc_visibility: CvcVisibility,

    /// Maximum number of BIN lookup results kept in memory.
    #[serde(default = "default_bin_cache_capacity")]
    pub bin_cache_capacity: usize,
}

fn default_supported_brands() -> Vec<CardBrand> {
    DEFAULT_SUPPORTED_BRANDS.into_iter().map(CardBrand::from).collect()
}

fn default_bin_cache_capacity() -> usize {
    CardType::ALL.len()
}

impl CheckoutConfiguration {
    /// Creates a configuration with defaults for everything but the client key.
    pub fn new(client_key: impl Into<String>) -> Self {
        Self {
            client_key: client_key.into(),
            public_key: None,
            supported_brands: default_supported_brands(),
            card_type: None,
            holder_name_required: false,
            cvc_visibility: CvcVisibility::default(),
            bin_cache_capacity: default_bin_cache_capacity(),
        }
    }

    /// Loads a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parses a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the public key used for BIN encryption.
    pub fn with_public_key(mut self, public_key: impl Into<String>) -> Self {
        self.public_key = Some(public_key.into());
        self
    }

    /// Replaces the supported brands.
    pub fn with_supported_brands<I, B>(mut self, brands: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<CardBrand>,
    {
        self.supported_brands = brands.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the BIN lookup `type` field.
    pub fn with_card_type(mut self, card_type: impl Into<String>) -> Self {
        self.card_type = Some(card_type.into());
        self
    }

    /// Sets whether the holder name is required.
    pub fn with_holder_name_required(mut self, required: bool) -> Self {
        self.holder_name_required = required;
        self
    }

    /// Sets the security code visibility.
    pub fn with_cvc_visibility(mut self, visibility: CvcVisibility) -> Self {
        self.cvc_visibility = visibility;
        self
    }

    /// Sets the BIN lookup cache capacity. Zero is raised to one.
    pub fn with_bin_cache_capacity(mut self, capacity: usize) -> Self {
        self.bin_cache_capacity = capacity.max(1);
        self
    }

    /// Returns true if the brand is in the supported list.
    pub fn is_supported(&self, brand: &CardBrand) -> bool {
        self.supported_brands.contains(brand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let config = CheckoutConfiguration::from_json(r#"{"client_key": "test_key"}"#).unwrap();
        assert_eq!(config, CheckoutConfiguration::new("test_key"));
        assert_eq!(config.bin_cache_capacity, CardType::ALL.len());
        assert_eq!(config.cvc_visibility, CvcVisibility::AlwaysShow);
        assert!(config.is_supported(&CardBrand::new("visa")));
        assert!(!config.is_supported(&CardBrand::new("maestro")));
    }

    #[test]
    fn test_full_json() {
        let json = r#"{
            "client_key": "test_key",
            "public_key": "10001|ABCD",
            "supported_brands": ["bcmc", "maestro", "someNewBrand"],
            "card_type": "debit",
            "holder_name_required": true,
            "cvc_visibility": "hide_first",
            "bin_cache_capacity": 5
        }"#;
        let config = CheckoutConfiguration::from_json(json).unwrap();
        assert_eq!(config.public_key.as_deref(), Some("10001|ABCD"));
        assert_eq!(config.supported_brands.len(), 3);
        assert_eq!(config.supported_brands[0].card_type(), Some(CardType::Bcmc));
        assert_eq!(config.supported_brands[2].card_type(), None);
        assert_eq!(config.card_type.as_deref(), Some("debit"));
        assert!(config.holder_name_required);
        assert_eq!(config.cvc_visibility, CvcVisibility::HideFirst);
        assert_eq!(config.bin_cache_capacity, 5);
    }

    #[test]
    fn test_builder() {
        let config = CheckoutConfiguration::new("key")
            .with_public_key("pk")
            .with_supported_brands([CardType::Bcmc, CardType::Maestro])
            .with_cvc_visibility(CvcVisibility::AlwaysHide)
            .with_bin_cache_capacity(0);
        assert_eq!(config.public_key.as_deref(), Some("pk"));
        assert!(config.is_supported(&CardBrand::from(CardType::Bcmc)));
        assert!(!config.is_supported(&CardBrand::from(CardType::Visa)));
        assert_eq!(config.bin_cache_capacity, 1);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            CheckoutConfiguration::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            CheckoutConfiguration::from_json("{}"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = CheckoutConfiguration::from_file("/nonexistent/checkout.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
