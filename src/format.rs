//! Card number normalization and display formatting.
//!
//! Every field validator runs its input through [`normalize`] first, so
//! shoppers can type spaces or dashes between digit groups.
//!
//! # Format Conventions
//!
//! - **American Express** (15 digits): `XXXX XXXXXX XXXXX`
//! - **Diners Club** (14 digits): `XXXX XXXXXX XXXX`
//! - **Other**: Groups of 4 with remainder at end
//!
//! # Example
//!
//! ```
//! use checkout_core::format::{format_card_number, normalize};
//!
//! assert_eq!(normalize("4111 1111-1111 1111"), "4111111111111111");
//! assert_eq!(format_card_number("378282246310005"), "3782 822463 10005");
//! ```

use crate::card::CardType;
use crate::detect;

/// Removes whitespace and separator characters (`-`, `.`) from user input.
///
/// Any other character is kept so validators can report it as illegal.
///
/// # Example
///
/// ```
/// use checkout_core::format::normalize;
///
/// assert_eq!(normalize(" 41-11 "), "4111");
/// assert_eq!(normalize("41a1"), "41a1");
/// ```
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && !is_separator(*c))
        .collect()
}

#[inline]
fn is_separator(c: char) -> bool {
    c == '-' || c == '.'
}

/// Returns true if the string is non-empty and consists of ASCII digits only.
#[inline]
pub fn is_digits_only(input: &str) -> bool {
    !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit())
}

/// Strips all formatting from a card number, leaving only digits.
///
/// # Example
///
/// ```
/// use checkout_core::format::strip_formatting;
///
/// assert_eq!(strip_formatting("4111 1111 1111 1111"), "4111111111111111");
/// assert_eq!(strip_formatting("4111-1111-1111-1111"), "4111111111111111");
/// ```
pub fn strip_formatting(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Formats a (possibly partial) card number with standard grouping.
///
/// The grouping follows the first brand estimated from the prefix.
///
/// # Example
///
/// ```
/// use checkout_core::format::format_card_number;
///
/// assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
/// assert_eq!(format_card_number("41111"), "4111 1");
/// ```
pub fn format_card_number(input: &str) -> String {
    let digits = strip_formatting(input);
    let card_type = detect::estimate(&digits).into_iter().next();
    format_for_card_type(&digits, card_type, " ")
}

/// Formats a card number for a known card type with a custom separator.
///
/// # Example
///
/// ```
/// use checkout_core::format::format_for_card_type;
/// use checkout_core::CardType;
///
/// assert_eq!(
///     format_for_card_type("378282246310005", Some(CardType::AmericanExpress), "-"),
///     "3782-822463-10005"
/// );
/// ```
pub fn format_for_card_type(input: &str, card_type: Option<CardType>, separator: &str) -> String {
    let digits: Vec<char> = input.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        return String::new();
    }

    let groups = grouping_for_card_type(card_type, digits.len());

    let mut result = String::with_capacity(digits.len() + groups.len() * separator.len());
    let mut pos = 0;

    for &group_size in &groups {
        if pos >= digits.len() {
            break;
        }
        if pos > 0 {
            result.push_str(separator);
        }
        let end = (pos + group_size).min(digits.len());
        result.extend(&digits[pos..end]);
        pos = end;
    }

    if pos < digits.len() {
        result.push_str(separator);
        result.extend(&digits[pos..]);
    }

    result
}

/// Returns the digit grouping pattern for a card type.
fn grouping_for_card_type(card_type: Option<CardType>, length: usize) -> Vec<usize> {
    match card_type {
        // 4-6-5
        Some(CardType::AmericanExpress) => vec![4, 6, 5],
        // 4-6-4
        Some(CardType::Diners) if length <= 14 => vec![4, 6, 4],
        _ => {
            let full_groups = length / 4;
            let remainder = length % 4;

            let mut groups = vec![4; full_groups];
            if remainder > 0 {
                groups.push(remainder);
            }
            groups
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_separators() {
        assert_eq!(normalize("4111 1111 1111 1111"), "4111111111111111");
        assert_eq!(normalize("4111-1111-1111-1111"), "4111111111111111");
        assert_eq!(normalize("4111.1111.1111.1111"), "4111111111111111");
        assert_eq!(normalize("\t4111\n"), "4111");
    }

    #[test]
    fn test_normalize_keeps_illegal_characters() {
        assert_eq!(normalize("4111_1111"), "4111_1111");
        assert_eq!(normalize("12a"), "12a");
    }

    #[test]
    fn test_is_digits_only() {
        assert!(is_digits_only("0123456789"));
        assert!(!is_digits_only(""));
        assert!(!is_digits_only("12 3"));
        assert!(!is_digits_only("١٢٣"));
    }

    #[test]
    fn test_format_visa_16() {
        assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
    }

    #[test]
    fn test_format_amex() {
        assert_eq!(format_card_number("378282246310005"), "3782 822463 10005");
        assert_eq!(format_card_number("37828"), "3782 8");
    }

    #[test]
    fn test_format_diners_14() {
        assert_eq!(format_card_number("36006666333344"), "3600 666633 3344");
    }

    #[test]
    fn test_format_already_formatted() {
        assert_eq!(format_card_number("4111-1111-1111-1111"), "4111 1111 1111 1111");
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_card_number(""), "");
        assert_eq!(format_card_number("   "), "");
    }

    #[test]
    fn test_format_19_digit() {
        assert_eq!(format_card_number("4111111111111111111"), "4111 1111 1111 1111 111");
    }

    #[test]
    fn test_format_unknown_prefix_uses_groups_of_four() {
        assert_eq!(format_for_card_type("000000000", None, " "), "0000 0000 0");
    }
}
