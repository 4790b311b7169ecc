//! # checkout_core
//!
//! Card input handling for payment checkout: brand detection, field
//! validation, BIN lookup and the state pipeline behind payment method
//! components.
//!
//! ## Features
//!
//! - Local card brand detection from prefix ranges (29 brands)
//! - Card number, expiry date and security code validation
//! - BIN lookup cache and repository with request coalescing
//! - Reducer / validator / view-state pipeline for card and BLIK components
//! - Masking of card numbers and codes in `Debug` output
//!
//! ## Quick Start
//!
//! ```rust
//! use checkout_core::{detect, validate_card_number, CardNumberValidation, CardType};
//!
//! // Detect candidate brands while typing
//! assert!(detect::estimate("4").contains(&CardType::Visa));
//!
//! // Validate a complete number
//! assert_eq!(validate_card_number("4111 1111 1111 1111", true), CardNumberValidation::Valid);
//! assert_eq!(
//!     validate_card_number("4111 1111 1111 1112", true),
//!     CardNumberValidation::InvalidLuhnCheck
//! );
//! ```
//!
//! ## Expiry Dates
//!
//! ```rust
//! use checkout_core::expiry::{parse_expiry_date, validate_expiry_date, ExpiryDateValidation};
//! use checkout_core::FieldPolicy;
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
//! let date = parse_expiry_date("12/30");
//! assert_eq!(validate_expiry_date(date, today, FieldPolicy::Required), ExpiryDateValidation::Valid);
//! ```
//!
//! ## Card Component
//!
//! ```rust
//! use checkout_core::state::card::{create_state_machine, CardComponentParams, CardIntent};
//! use checkout_core::CheckoutConfiguration;
//!
//! let config = CheckoutConfiguration::new("test_key");
//! let mut component = create_state_machine(CardComponentParams::from(&config));
//!
//! let view = component.dispatch(CardIntent::UpdateCardNumber("4111111111111111".into()));
//! assert_eq!(view.formatted_card_number, "4111 1111 1111 1111");
//! assert!(!component.is_valid());
//! ```
//!
//! ## Security
//!
//! - `Debug` of component states and intents masks card numbers and codes
//! - Logs carry brand names, error codes and counts, never card data
//! - BINs are hashed before being used as cache keys
//! - No unsafe code (`#![deny(unsafe_code)]`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod bin_lookup;
pub mod card;
pub mod config;
pub mod cvc;
pub mod detect;
pub mod error;
pub mod expiry;
pub mod format;
pub mod luhn;
pub mod mask;
pub mod state;
pub mod validate;

// Re-export main types at crate root
pub use card::{
    CardBrand, CardType, DetectedCardType, FieldPolicy, MAX_CARD_NUMBER_LENGTH,
    MIN_CARD_NUMBER_LENGTH,
};
pub use config::{CheckoutConfiguration, CvcVisibility};
pub use error::{BinLookupError, ConfigError};
pub use validate::{is_valid, validate_card_number, CardNumberValidation};

#[cfg(test)]
mod tests {
    use super::*;

    // Standard test card numbers from payment processors
    const VISA_16: &str = "4111111111111111";
    const VISA_13: &str = "4222222222222";
    const MASTERCARD: &str = "5555555555554444";
    const MASTERCARD_2: &str = "2223000048400011";
    const AMEX: &str = "378282246310005";
    const DISCOVER: &str = "6011000990139424";
    const DINERS: &str = "36006666333344";
    const JCB: &str = "3530111333300000";

    #[test]
    fn test_known_numbers_are_valid() {
        for number in [VISA_16, VISA_13, MASTERCARD, MASTERCARD_2, AMEX, DISCOVER, DINERS, JCB] {
            assert_eq!(validate_card_number(number, true), CardNumberValidation::Valid, "{}", number);
            assert!(is_valid(number));
        }
    }

    #[test]
    fn test_known_numbers_detect_their_brand() {
        let expected = [
            (VISA_16, CardType::Visa),
            (MASTERCARD, CardType::Mastercard),
            (MASTERCARD_2, CardType::Mastercard),
            (AMEX, CardType::AmericanExpress),
            (DISCOVER, CardType::Discover),
            (DINERS, CardType::Diners),
            (JCB, CardType::Jcb),
        ];
        for (number, card_type) in expected {
            assert!(detect::estimate(number).contains(&card_type), "{}", number);
        }
    }

    #[test]
    fn test_formatted_input() {
        assert!(is_valid("4111-1111-1111-1111"));
        assert!(is_valid("4111 1111 1111 1111"));
        assert!(is_valid("4111-1111 1111-1111"));
    }

    #[test]
    fn test_validation_precedence() {
        assert_eq!(
            validate_card_number("4111-1111-1111-111X", true),
            CardNumberValidation::InvalidIllegalCharacters
        );
        assert_eq!(
            validate_card_number("41111111111111111111", true),
            CardNumberValidation::InvalidTooLong
        );
        assert_eq!(validate_card_number("41111111111", true), CardNumberValidation::InvalidTooShort);
        assert_eq!(validate_card_number("", true), CardNumberValidation::InvalidTooShort);
        assert_eq!(
            validate_card_number("4111111111111112", false),
            CardNumberValidation::Valid
        );
    }

    #[test]
    fn test_masking() {
        let masked = mask::mask_card_number(VISA_16);
        assert!(!masked.contains(VISA_16));
        assert!(masked.contains("1111"));
        assert!(masked.contains('*'));
    }

    #[test]
    fn test_thread_safety() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CardType>();
        assert_send_sync::<CardBrand>();
        assert_send_sync::<DetectedCardType>();
        assert_send_sync::<CheckoutConfiguration>();
        assert_send_sync::<BinLookupError>();
        assert_send_sync::<bin_lookup::DetectCardTypeRepository>();
        assert_send_sync::<state::card::CardStateMachine>();
    }
}
