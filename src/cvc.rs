//! Security code (CVC/CVV/CID) validation.
//!
//! # Length Requirements
//!
//! - American Express: 4 digits (printed on front)
//! - All other cards, or no detected brand: 3 digits (printed on back)
//!
//! An empty code is accepted when the brand's CVC policy is optional or
//! hidden.
//!
//! # Example
//!
//! ```
//! use checkout_core::cvc::{validate_security_code, CvcValidation};
//!
//! assert_eq!(validate_security_code("737", None), CvcValidation::Valid);
//! assert_eq!(validate_security_code("7373", None), CvcValidation::Invalid);
//! ```

use crate::card::DetectedCardType;
use crate::format::normalize;
use std::fmt;

/// Security code length for American Express.
pub const AMEX_SECURITY_CODE_SIZE: usize = 4;

/// Security code length for every other brand.
pub const GENERAL_CARD_SECURITY_CODE_SIZE: usize = 3;

/// Outcome of security code validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CvcValidation {
    /// The code has the right length for the brand.
    Valid,
    /// No code was entered and the brand does not require one.
    ValidNotRequired,
    /// Wrong length or illegal characters.
    Invalid,
}

impl CvcValidation {
    /// Returns true for both valid variants.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid | Self::ValidNotRequired)
    }

    /// Stable identifier used in CLI output and logs.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::ValidNotRequired => "valid_not_required",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for CvcValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::Valid => "security code is valid",
            Self::ValidNotRequired => "security code is not required",
            Self::Invalid => "security code is not valid",
        };
        f.write_str(message)
    }
}

/// Returns the expected security code length for a detected card type.
#[inline]
pub fn expected_length(card_type: Option<&DetectedCardType>) -> usize {
    match card_type {
        Some(card_type) if card_type.is_american_express() => AMEX_SECURITY_CODE_SIZE,
        _ => GENERAL_CARD_SECURITY_CODE_SIZE,
    }
}

/// Validates a security code for the detected card type.
///
/// # Example
///
/// ```
/// use checkout_core::cvc::{validate_security_code, CvcValidation};
/// use checkout_core::detect::detect_locally;
///
/// let amex = detect_locally("378282246310005", &[]).remove(0);
/// assert_eq!(validate_security_code("8689", Some(&amex)), CvcValidation::Valid);
/// assert_eq!(validate_security_code("868", Some(&amex)), CvcValidation::Invalid);
/// ```
pub fn validate_security_code(code: &str, card_type: Option<&DetectedCardType>) -> CvcValidation {
    let normalized = normalize(code);

    if !normalized.bytes().all(|b| b.is_ascii_digit()) {
        return CvcValidation::Invalid;
    }

    let not_required = card_type.is_some_and(|card_type| card_type.cvc_policy.is_not_required());
    if normalized.is_empty() && not_required {
        return CvcValidation::ValidNotRequired;
    }

    if normalized.len() == expected_length(card_type) {
        CvcValidation::Valid
    } else {
        CvcValidation::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardBrand, CardType, FieldPolicy};

    fn card_type(card_type: CardType, cvc_policy: FieldPolicy) -> DetectedCardType {
        DetectedCardType {
            card_brand: CardBrand::from(card_type),
            is_reliable: true,
            enable_luhn_check: true,
            cvc_policy,
            expiry_date_policy: FieldPolicy::Required,
            is_supported: true,
            pan_length: None,
            localized_brand: None,
            payment_method_variant: None,
        }
    }

    #[test]
    fn test_amex_four_digits() {
        let amex = card_type(CardType::AmericanExpress, FieldPolicy::Required);
        assert_eq!(validate_security_code("8689", Some(&amex)), CvcValidation::Valid);
        assert_eq!(validate_security_code("737", Some(&amex)), CvcValidation::Invalid);
    }

    #[test]
    fn test_other_brands_three_digits() {
        for brand in [CardType::Visa, CardType::Mastercard, CardType::Maestro] {
            let detected = card_type(brand, FieldPolicy::Required);
            assert_eq!(validate_security_code("737", Some(&detected)), CvcValidation::Valid);
            assert_eq!(validate_security_code("8689", Some(&detected)), CvcValidation::Invalid);
        }
    }

    #[test]
    fn test_unknown_brand() {
        assert_eq!(validate_security_code("737", None), CvcValidation::Valid);
        assert_eq!(validate_security_code("8689", None), CvcValidation::Invalid);
        assert_eq!(validate_security_code("", None), CvcValidation::Invalid);
    }

    #[test]
    fn test_non_digits() {
        assert_eq!(validate_security_code("12a", None), CvcValidation::Invalid);
        assert_eq!(validate_security_code("١٢٣", None), CvcValidation::Invalid);
    }

    #[test]
    fn test_separators_are_stripped() {
        assert_eq!(validate_security_code(" 7 3 7 ", None), CvcValidation::Valid);
    }

    #[test]
    fn test_empty_code_not_required() {
        let optional = card_type(CardType::Visa, FieldPolicy::Optional);
        let hidden = card_type(CardType::Bcmc, FieldPolicy::Hidden);
        assert_eq!(validate_security_code("", Some(&optional)), CvcValidation::ValidNotRequired);
        assert_eq!(validate_security_code("", Some(&hidden)), CvcValidation::ValidNotRequired);
        // a typed code still has to be well formed
        assert_eq!(validate_security_code("12", Some(&optional)), CvcValidation::Invalid);
        assert_eq!(validate_security_code("123", Some(&optional)), CvcValidation::Valid);
    }

    #[test]
    fn test_is_valid() {
        assert!(CvcValidation::Valid.is_valid());
        assert!(CvcValidation::ValidNotRequired.is_valid());
        assert!(!CvcValidation::Invalid.is_valid());
    }
}
