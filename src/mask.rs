//! Masking of sensitive values for `Debug` output and logs.
//!
//! Raw card numbers and security codes never reach a log line or a `Debug`
//! string. Only the last 4 digits of a card number may be shown.

/// Masks a card number string, showing only the last 4 digits.
///
/// Non-digit characters are dropped. Numbers with 4 digits or fewer are
/// fully masked.
///
/// # Example
///
/// ```
/// use checkout_core::mask::mask_card_number;
///
/// assert_eq!(mask_card_number("4111 1111 1111 1111"), "****-****-****-1111");
/// assert_eq!(mask_card_number("411"), "***");
/// ```
pub fn mask_card_number(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(|c| c.is_ascii_digit()).collect();
    let len = digits.len();

    if len <= 4 {
        return "*".repeat(len);
    }

    let masked_count = len - 4;
    let mut result = String::with_capacity(len + (len / 4));

    for i in 0..masked_count {
        if i > 0 && i % 4 == 0 {
            result.push('-');
        }
        result.push('*');
    }

    if masked_count % 4 == 0 {
        result.push('-');
    }

    result.extend(&digits[len - 4..]);
    result
}

/// Masks a secret completely, keeping only its length visible.
///
/// # Example
///
/// ```
/// use checkout_core::mask::mask_secret;
///
/// assert_eq!(mask_secret("737"), "***");
/// ```
#[inline]
pub fn mask_secret(input: &str) -> String {
    "*".repeat(input.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_card_number_16_digits() {
        assert_eq!(mask_card_number("4111111111111111"), "****-****-****-1111");
        assert_eq!(mask_card_number("4111-1111-1111-1111"), "****-****-****-1111");
    }

    #[test]
    fn test_mask_card_number_15_digits() {
        let masked = mask_card_number("378282246310005");
        assert!(masked.ends_with("0005"));
        assert!(!masked.contains("3782"));
    }

    #[test]
    fn test_mask_short_input() {
        assert_eq!(mask_card_number(""), "");
        assert_eq!(mask_card_number("4111"), "****");
        assert_eq!(mask_card_number("41111"), "*1111");
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "");
        assert_eq!(mask_secret("1234"), "****");
    }
}
