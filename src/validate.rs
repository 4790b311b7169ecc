//! Card number validation.
//!
//! Validation runs on every keystroke, so it never fails: each check yields a
//! closed [`CardNumberValidation`] result. Checks run in a fixed order and
//! the first failing one wins:
//!
//! 1. illegal characters (anything but digits after normalization)
//! 2. too long (more than 19 digits)
//! 3. too short (fewer than 12 digits)
//! 4. unsupported brand (brand-aware variant only)
//! 5. Luhn checksum (only when enabled for the brand)

use crate::card::{MAX_CARD_NUMBER_LENGTH, MIN_CARD_NUMBER_LENGTH};
use crate::format::{is_digits_only, normalize};
use crate::luhn;
use std::fmt;

/// Outcome of card number validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardNumberValidation {
    /// The card number is valid.
    Valid,
    /// The input contains a character other than a digit or separator.
    InvalidIllegalCharacters,
    /// More than 19 digits.
    InvalidTooLong,
    /// Fewer than 12 digits.
    InvalidTooShort,
    /// The detected brand is not accepted by the merchant.
    InvalidUnsupportedBrand,
    /// The Luhn checksum failed.
    InvalidLuhnCheck,
}

impl CardNumberValidation {
    /// Returns true for [`CardNumberValidation::Valid`].
    #[inline]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Stable identifier used in CLI output and logs.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::InvalidIllegalCharacters => "invalid_illegal_characters",
            Self::InvalidTooLong => "invalid_too_long",
            Self::InvalidTooShort => "invalid_too_short",
            Self::InvalidUnsupportedBrand => "invalid_unsupported_brand",
            Self::InvalidLuhnCheck => "invalid_luhn_check",
        }
    }
}

impl fmt::Display for CardNumberValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::Valid => "card number is valid",
            Self::InvalidIllegalCharacters => {
                "card number contains illegal characters (only digits, spaces and hyphens allowed)"
            }
            Self::InvalidTooLong => "card number too long: maximum is 19 digits",
            Self::InvalidTooShort => "card number too short: minimum is 12 digits",
            Self::InvalidUnsupportedBrand => "card brand is not supported",
            Self::InvalidLuhnCheck => {
                "invalid checksum (Luhn check failed) - please verify the card number"
            }
        };
        f.write_str(message)
    }
}

/// Validates a card number.
///
/// # Arguments
///
/// * `number` - The card number as typed. May contain spaces, hyphens or dots.
/// * `enable_luhn_check` - Whether the detected brand uses the Luhn checksum.
///
/// # Example
///
/// ```
/// use checkout_core::validate::{validate_card_number, CardNumberValidation};
///
/// assert_eq!(validate_card_number("4111 1111 1111 1111", true), CardNumberValidation::Valid);
/// assert_eq!(validate_card_number("4111 1111 1111 1112", true), CardNumberValidation::InvalidLuhnCheck);
/// assert_eq!(validate_card_number("4111 1111 1111 1112", false), CardNumberValidation::Valid);
/// ```
pub fn validate_card_number(number: &str, enable_luhn_check: bool) -> CardNumberValidation {
    let normalized = normalize(number);
    if let Some(failure) = check_format(&normalized) {
        return failure;
    }
    check_luhn(&normalized, enable_luhn_check)
}

/// Validates a card number against the brand it was detected as.
///
/// Same as [`validate_card_number`], with the brand support check placed
/// after the length checks and before the checksum.
///
/// # Example
///
/// ```
/// use checkout_core::validate::{validate_card_number_for_brand, CardNumberValidation};
///
/// assert_eq!(
///     validate_card_number_for_brand("4111111111111111", true, false),
///     CardNumberValidation::InvalidUnsupportedBrand
/// );
/// ```
pub fn validate_card_number_for_brand(
    number: &str,
    enable_luhn_check: bool,
    is_brand_supported: bool,
) -> CardNumberValidation {
    let normalized = normalize(number);
    if let Some(failure) = check_format(&normalized) {
        return failure;
    }
    if !is_brand_supported {
        return CardNumberValidation::InvalidUnsupportedBrand;
    }
    check_luhn(&normalized, enable_luhn_check)
}

/// Quick yes/no check with the Luhn checksum enabled.
///
/// # Example
///
/// ```
/// use checkout_core::validate::is_valid;
///
/// assert!(is_valid("4111-1111-1111-1111"));
/// assert!(!is_valid("4111-1111-1111-1112"));
/// ```
#[inline]
pub fn is_valid(number: &str) -> bool {
    validate_card_number(number, true).is_valid()
}

fn check_format(normalized: &str) -> Option<CardNumberValidation> {
    // Empty input has no illegal character, it is simply too short.
    if !normalized.is_empty() && !is_digits_only(normalized) {
        return Some(CardNumberValidation::InvalidIllegalCharacters);
    }
    let length = normalized.len();
    if length > MAX_CARD_NUMBER_LENGTH {
        return Some(CardNumberValidation::InvalidTooLong);
    }
    if length < MIN_CARD_NUMBER_LENGTH {
        return Some(CardNumberValidation::InvalidTooShort);
    }
    None
}

fn check_luhn(normalized: &str, enable_luhn_check: bool) -> CardNumberValidation {
    if enable_luhn_check && !luhn::is_luhn_valid(normalized) {
        CardNumberValidation::InvalidLuhnCheck
    } else {
        CardNumberValidation::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VISA_VALID: &str = "4111111111111111";
    const VISA_VALID_FORMATTED: &str = "4111-1111-1111-1111";
    const VISA_VALID_SPACES: &str = "4111 1111 1111 1111";

    const MASTERCARD_VALID: &str = "5555555555554444";
    const AMEX_VALID: &str = "378282246310005";
    const BCMC_VALID: &str = "6703444444444449";

    #[test]
    fn test_validate_valid_cards() {
        for number in [VISA_VALID, MASTERCARD_VALID, AMEX_VALID, BCMC_VALID] {
            assert_eq!(validate_card_number(number, true), CardNumberValidation::Valid);
        }
    }

    #[test]
    fn test_validate_formatted() {
        assert_eq!(validate_card_number(VISA_VALID_FORMATTED, true), CardNumberValidation::Valid);
        assert_eq!(validate_card_number(VISA_VALID_SPACES, true), CardNumberValidation::Valid);
        assert_eq!(validate_card_number("4111.1111.1111.1111", true), CardNumberValidation::Valid);
    }

    #[test]
    fn test_invalid_checksum() {
        assert_eq!(
            validate_card_number("4111111111111112", true),
            CardNumberValidation::InvalidLuhnCheck
        );
    }

    #[test]
    fn test_luhn_disabled_accepts_bad_checksum() {
        assert_eq!(validate_card_number("4111111111111112", false), CardNumberValidation::Valid);
    }

    #[test]
    fn test_illegal_character() {
        assert_eq!(
            validate_card_number("4111-1111-1111-111X", true),
            CardNumberValidation::InvalidIllegalCharacters
        );
    }

    #[test]
    fn test_illegal_characters_win_over_length() {
        // too short and contains a letter
        assert_eq!(validate_card_number("41a", true), CardNumberValidation::InvalidIllegalCharacters);
        // too long and contains a letter
        assert_eq!(
            validate_card_number("4111111111111111111111a", true),
            CardNumberValidation::InvalidIllegalCharacters
        );
    }

    #[test]
    fn test_too_short() {
        assert_eq!(validate_card_number("41111111111", true), CardNumberValidation::InvalidTooShort);
        assert_eq!(validate_card_number("", true), CardNumberValidation::InvalidTooShort);
        assert_eq!(validate_card_number("  --  ", true), CardNumberValidation::InvalidTooShort);
    }

    #[test]
    fn test_too_long() {
        assert_eq!(
            validate_card_number("41111111111111111111", true),
            CardNumberValidation::InvalidTooLong
        );
    }

    #[test]
    fn test_length_boundaries() {
        // 12 and 19 digit numbers with Luhn disabled
        assert_eq!(validate_card_number("123456789012", false), CardNumberValidation::Valid);
        assert_eq!(validate_card_number("1234567890123456789", false), CardNumberValidation::Valid);
    }

    #[test]
    fn test_length_wins_over_luhn() {
        assert_eq!(validate_card_number("41111111112", true), CardNumberValidation::InvalidTooShort);
    }

    #[test]
    fn test_unsupported_brand_precedence() {
        assert_eq!(
            validate_card_number_for_brand("4111111111111112", true, false),
            CardNumberValidation::InvalidUnsupportedBrand
        );
        assert_eq!(
            validate_card_number_for_brand("411111", true, false),
            CardNumberValidation::InvalidTooShort
        );
        assert_eq!(
            validate_card_number_for_brand("4111111111111112", true, true),
            CardNumberValidation::InvalidLuhnCheck
        );
        assert_eq!(
            validate_card_number_for_brand(VISA_VALID, true, true),
            CardNumberValidation::Valid
        );
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid(VISA_VALID));
        assert!(is_valid(VISA_VALID_FORMATTED));
        assert!(!is_valid("4111111111111112"));
        assert!(!is_valid(""));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            CardNumberValidation::InvalidLuhnCheck.to_string(),
            "invalid checksum (Luhn check failed) - please verify the card number"
        );
        assert_eq!(CardNumberValidation::InvalidTooShort.code(), "invalid_too_short");
    }

    #[test]
    fn test_various_test_cards() {
        assert!(is_valid("4012888888881881"));
        assert!(is_valid("4222222222222"));
        assert!(is_valid("5105105105105100"));
        assert!(is_valid("371449635398431"));
        assert!(is_valid("6011000990139424"));
        assert!(is_valid("30569309025904"));
        assert!(is_valid("3530111333300000"));
    }
}
